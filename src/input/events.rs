//! Source and semantic input events

use std::fmt;

/// External producer feeding the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Gesture,
    Speech,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Gesture => write!(f, "gesture"),
            SourceKind::Speech => write!(f, "speech"),
        }
    }
}

/// Raw event pushed by a producer task over the source channel
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// One processed video frame
    HandFrame { fingers_extended: bool },

    /// Finalized speech transcript
    Transcript(String),

    /// Recognizer started or stopped listening
    Listening(bool),

    /// Producer engine is running
    Available(SourceKind),

    /// Producer engine is missing or failed to start
    Unavailable { source: SourceKind, reason: String },
}

/// Semantic input events generated from state changes each frame
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Fingers went from folded (or no hand) to extended
    GestureStarted,

    /// Fingers no longer extended
    GestureEnded,

    /// One finalized voice command
    Utterance(String),

    ListeningChanged(bool),

    /// A producer appeared or went away
    SourceChanged { source: SourceKind, available: bool },
}

/// Request for the simulation or assistant produced by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Jump,
    Command(String),
}

/// Gesture status shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandIndicator {
    #[default]
    Idle,
    Detected,
}

impl HandIndicator {
    pub fn label(self) -> &'static str {
        match self {
            HandIndicator::Idle => "IDLE",
            HandIndicator::Detected => "DETECTED",
        }
    }
}
