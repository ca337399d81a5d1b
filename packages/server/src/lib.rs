//! Touchline collaboration server library.
//!
//! This library implements the real-time collaboration room for the
//! Touchline coaching tool: a shared tactical formation board, an analysis
//! document and a chat transcript, fanned out to connected coaches,
//! analysts and viewers over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
