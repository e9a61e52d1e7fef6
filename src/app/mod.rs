//! Game application module
//!
//! Handles the frame loop, the terminal front end and keyboard input.

mod runner;
pub mod terminal;

pub use runner::{App, RunSummary, build_generator};
