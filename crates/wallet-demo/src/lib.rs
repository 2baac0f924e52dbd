#![forbid(unsafe_code)]

//! Terminal frontend for the card wallet.
//!
//! The binary in `main.rs` owns the event loop; this library holds the
//! testable pieces: option parsing, crossterm input mapping, the cell
//! painter, and the terminal session guard.

pub mod bell;
pub mod cli;
pub mod error;
pub mod input;
pub mod paint;
pub mod session;
