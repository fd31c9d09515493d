//! Chat session state.
//!
//! A session is either `Idle` or `Awaiting` a relay reply. Submitting appends
//! the user's message right away, before the relay answers. Settling the call
//! always returns the session to `Idle`. A reply is appended; a failure is kept
//! only as a transient error string and never enters the transcript.

use log::{debug, warn};
use thiserror::Error;

use crate::message::{Message, Transcript};
use crate::storage::TranscriptStore;
use crate::transport::{RelayClientError, RelayTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Awaiting,
}

/// Why a submission was ignored
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("message is empty")]
    EmptyInput,
    #[error("a message is already being sent")]
    AlreadyAwaiting,
}

/// Token for an accepted submission.
///
/// Handed out by [`ChatSession::begin_submit`] and consumed by
/// [`ChatSession::complete`], so each accepted send settles exactly once.
#[derive(Debug)]
#[must_use = "a pending send must be completed to return the session to Idle"]
pub struct PendingSend {
    message: String,
}

impl PendingSend {
    /// Text to hand to the relay
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing happened; the transcript is unchanged
    Ignored(SubmitRejected),
    /// User message and assistant reply were appended
    Replied,
    /// Only the user message was appended; carries the error now on display
    Failed(String),
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Transcript,
    input: String,
    state: SessionState,
    error: Option<String>,
    store: Box<dyn TranscriptStore>,
}

impl ChatSession {
    /// Opens a session, rehydrating the transcript from `store`
    pub fn open(store: Box<dyn TranscriptStore>) -> Self {
        let transcript = store.load();
        debug!("Opened chat session with {} messages", transcript.len());
        Self {
            transcript,
            input: String::new(),
            state: SessionState::Idle,
            error: None,
            store,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Starts sending the current input.
    ///
    /// On success the user message is already in the transcript and persisted,
    /// the input is cleared, any previous error is dropped and the session is
    /// `Awaiting`. Blank input and overlapping sends are rejected untouched.
    pub fn begin_submit(&mut self) -> Result<PendingSend, SubmitRejected> {
        if self.input.trim().is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }
        if self.state == SessionState::Awaiting {
            return Err(SubmitRejected::AlreadyAwaiting);
        }

        self.error = None;
        self.state = SessionState::Awaiting;

        let message = std::mem::take(&mut self.input);
        self.append(Message::user(message.clone()));

        Ok(PendingSend { message })
    }

    /// Settles a send started by [`begin_submit`](Self::begin_submit).
    pub fn complete(
        &mut self,
        pending: PendingSend,
        outcome: Result<String, RelayClientError>,
    ) -> SubmitOutcome {
        self.state = SessionState::Idle;
        match outcome {
            Ok(reply) => {
                self.append(Message::assistant(reply));
                SubmitOutcome::Replied
            }
            Err(e) => {
                let message = e.display_message();
                warn!(
                    "Relay failed for a {}-byte message: {}",
                    pending.message.len(),
                    message
                );
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Sends the current input through `transport` and settles the result.
    ///
    /// Dropping the returned future mid-flight leaves the user message in the
    /// transcript and discards whatever the relay would have answered.
    pub async fn submit<T>(&mut self, transport: &T) -> SubmitOutcome
    where
        T: RelayTransport + ?Sized,
    {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(rejected) => {
                debug!("Ignoring submission: {}", rejected);
                return SubmitOutcome::Ignored(rejected);
            }
        };
        let outcome = transport.relay(pending.message()).await;
        self.complete(pending, outcome)
    }

    /// Empties the transcript
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.persist();
    }

    fn append(&mut self, message: Message) {
        self.transcript.push(message);
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.transcript) {
            warn!("Failed to persist transcript: {}", e);
        }
    }
}
