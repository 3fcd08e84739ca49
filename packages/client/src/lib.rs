//! Terminal chat client for a single WebSocket connection.
//!
//! Text typed by the user is sent as raw text frames and every inbound frame
//! is shown as a bot message. There is no envelope, no reconnection and no
//! persistence: when the connection ends, the session ends.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod sink;
pub mod view;

pub use client::ChatClient;
pub use config::{ClientConfig, Endpoint};
pub use error::ClientError;
pub use runner::run_client;
pub use session::{SessionOutcome, run_session};
