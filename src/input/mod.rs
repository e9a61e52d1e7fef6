//! Input fusion
//!
//! Merges the asynchronous producers (hand tracking, speech recognition)
//! into the frame loop:
//! - Producer tasks push typed [`SourceEvent`]s into one unbounded channel
//! - The collector drains the channel once per frame into an [`InputState`]
//! - The context turns state changes into semantic [`InputEvent`]s
//! - Handlers consume events by priority and emit [`InputAction`]s
//!
//! # Architecture
//!
//! ```text
//! HandTracker ─┐
//!              ├─ SourceEvent → InputCollector → InputState
//! Recognizer ──┘                                    ↓
//!                                              InputContext
//!                                           (generates events)
//!                                                   ↓
//!                                             InputHandlers
//!                                             (by priority)
//!                                                   ↓
//!                                              InputAction
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let (mut collector, events) = InputCollector::channel();
//! let gesture = spawn_gesture_source(tracker, events.clone(), &runtime);
//!
//! let mut context = InputContext::new();
//! context.register_handler(Box::new(GestureHandler::new(cooldown)));
//! context.register_handler(Box::new(VoiceHandler::new()));
//!
//! // Each frame, before the simulation tick
//! collector.collect(Instant::now());
//! context.update_state(collector.clone_state());
//! context.process();
//! let actions = context.take_actions();
//! collector.advance_frame();
//! ```

mod collector;
mod context;
mod events;
pub mod gesture;
mod handler;
mod source;
pub mod speech;
mod state;

// Re-export public API
pub use collector::{InputCollector, SourceSender};
pub use context::InputContext;
pub use events::{HandIndicator, InputAction, InputEvent, SourceEvent, SourceKind};
pub use gesture::{
    ChannelHandTracker, HandLandmarks, HandTracker, Landmark, OpenPalmClassifier, TrackerFrame,
    spawn_gesture_source,
};
pub use handler::{GestureHandler, InputHandler, VoiceHandler};
pub use source::{SourceError, SourceHandle, report_unavailable};
pub use speech::{
    ChannelRecognizer, LineRecognizer, RecognizerEvent, SpeechRecognizer, spawn_speech_source,
};
pub use state::{GestureEdge, InputState, SignalState};
