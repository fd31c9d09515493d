//! HTTP relay between chat clients and the Gemini API.
//!
//! One endpoint, `POST /api/chat`, accepts `{ "message": ... }`, forwards the text
//! as a single prompt upstream and answers with `{ "response": ... }` or
//! `{ "error": ... }`.

pub mod config;
pub mod http_server;
pub mod relay;
