// Core Gemini relay functionality:
// - API client for Gemini
// - Request/response data structures and reply extraction
// - Configuration loading
// - Shared error types
// - Relay wire types shared by the daemon and the chat client

// Export client module - API client for Gemini
pub mod client;
pub use client::*;

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Export relay wire types
pub mod rpc_types;
pub use rpc_types::{RelayRequest, RelayResponse};
