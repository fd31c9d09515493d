use colored::*;

use crate::message::Sender;
use crate::session::{ChatSession, SessionState};

/// Shown while the session is awaiting a reply
pub const TYPING_INDICATOR: &str = "Gemini is typing...";

/// Which side of the conversation a message sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: &'static str,
    pub text: String,
    pub timestamp: String,
    pub align: Align,
}

/// Everything the front end needs to draw a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub entries: Vec<Entry>,
    pub typing: bool,
    pub error: Option<String>,
    pub input: String,
    pub can_send: bool,
}

/// Projects the session onto a [`View`]. Reads only; calling it twice yields the same view.
pub fn render(session: &ChatSession) -> View {
    let entries = session
        .transcript()
        .iter()
        .map(|message| Entry {
            label: message.sender.label(),
            text: message.text.clone(),
            timestamp: message.timestamp.clone(),
            align: match message.sender {
                Sender::User => Align::Right,
                Sender::Assistant => Align::Left,
            },
        })
        .collect();

    let awaiting = session.state() == SessionState::Awaiting;
    View {
        entries,
        typing: awaiting,
        error: session.error().map(str::to_string),
        input: session.input().to_string(),
        can_send: !awaiting,
    }
}

/// Formats one entry for the terminal
pub fn format_entry(entry: &Entry) -> String {
    let label = match entry.align {
        Align::Right => entry.label.green().bold(),
        Align::Left => entry.label.blue().bold(),
    };
    format!(
        "{} {}\n{}",
        label,
        format!("[{}]", entry.timestamp).dimmed(),
        entry.text
    )
}

/// Prints the entries the terminal has not shown yet, advancing `shown`
pub fn print_new_entries(view: &View, shown: &mut usize) {
    for entry in view.entries.iter().skip(*shown) {
        println!("{}", format_entry(entry));
        println!();
    }
    *shown = view.entries.len();
}

/// Prints the session's transient error, if any
pub fn print_error(view: &View) {
    if let Some(error) = &view.error {
        eprintln!("{} {}", "Error:".red().bold(), error.red());
    }
}
