//! Utilities shared by the chatterm binaries and tests.

pub mod logger;
pub mod time;
