//! CLI client for Touchline collaboration rooms.
//!
//! Joins a room over WebSocket, renders incoming room events as terminal
//! lines and sends chat messages and formation updates from stdin.

mod domain;
mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::{ClientConfig, run_client};
