//! Chat session client for the Gemini relay.
//!
//! Holds the transcript and the Idle/Awaiting state of one chat session, sends
//! each submission to the relay daemon, and keeps the transcript in local
//! storage between runs.

pub mod app;
pub mod config;
pub mod message;
pub mod render;
pub mod session;
pub mod storage;
pub mod transport;

pub use message::{Message, Sender, Transcript};
pub use session::{ChatSession, SessionState, SubmitOutcome, SubmitRejected};
pub use storage::{FileTranscriptStore, MemoryTranscriptStore, TranscriptStore};
pub use transport::{HttpRelayTransport, RelayClientError, RelayTransport};
