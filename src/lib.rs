//! Neural Runner
//!
//! A terminal runner game with a voice assistant (JARVIS). Hand gestures make
//! the runner jump; spoken commands recolor the HUD, restart the game or get
//! a short generated reply.

/// Frame loop and terminal front end
pub mod app;

/// Voice command routing, text generation and conversation history
pub mod assistant;

/// Build-time information (git SHA, branch, timestamp, etc.)
pub mod build_info;

/// Profile-based configuration
pub mod config;

pub mod error;

/// Self-checks runnable with `jarvis --health`
pub mod health;

/// Gesture and speech input fusion
pub mod input;

/// Per-frame orchestration of input, assistant and simulation
pub mod session;

/// Game simulation - world state, obstacles and physics
pub mod sim;

pub use error::{Error, Result};
