use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render::{print_error, print_new_entries, render, TYPING_INDICATOR};
use crate::session::{ChatSession, SubmitOutcome, SubmitRejected};
use crate::transport::RelayTransport;

fn typing_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(TYPING_INDICATOR);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Sends one message, prints the reply or the error, and returns
pub async fn run_single_message(
    session: &mut ChatSession,
    transport: &dyn RelayTransport,
    message: String,
) -> Result<()> {
    session.set_input(message);

    let spinner = typing_spinner();
    let outcome = session.submit(transport).await;
    spinner.finish_and_clear();

    let view = render(session);
    match outcome {
        SubmitOutcome::Replied => {
            if let Some(reply) = view.entries.last() {
                println!("{}", reply.text);
            }
        }
        SubmitOutcome::Failed(_) => print_error(&view),
        SubmitOutcome::Ignored(reason) => {
            eprintln!("{} {}", "Nothing sent:".yellow(), reason);
        }
    }
    Ok(())
}

/// Runs an interactive chat session against the relay
pub async fn run_interactive_chat(
    session: &mut ChatSession,
    transport: &dyn RelayTransport,
) -> Result<()> {
    println!("Chatbot Gemini");
    println!("Type '/clear' to erase the transcript, '/exit' to quit.");
    println!();

    let mut shown = 0;
    print_new_entries(&render(session), &mut shown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        // Prompt for user input
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match line.trim() {
            "/exit" | "/quit" => {
                println!("Exiting chat session.");
                break;
            }
            "/clear" => {
                session.clear();
                shown = 0;
                println!("Transcript cleared.");
                continue;
            }
            _ => {}
        }

        session.set_input(line);
        let pending = match session.begin_submit() {
            Ok(pending) => pending,
            Err(SubmitRejected::EmptyInput) => continue,
            Err(rejected) => {
                debug!("Submission rejected: {}", rejected);
                continue;
            }
        };

        // The terminal already echoed what the user typed
        let view = render(session);
        shown = view.entries.len();

        let spinner = typing_spinner();
        let outcome = tokio::select! {
            outcome = transport.relay(pending.message()) => outcome,
            _ = tokio::signal::ctrl_c() => {
                spinner.finish_and_clear();
                info!("Interrupted while awaiting a reply, discarding it");
                println!("Exiting chat session.");
                return Ok(());
            }
        };
        spinner.finish_and_clear();

        let _ = session.complete(pending, outcome);

        let view = render(session);
        print_new_entries(&view, &mut shown);
        print_error(&view);
    }

    Ok(())
}
