//! Source event collection

use std::time::Instant;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::events::{SourceEvent, SourceKind};
use super::state::InputState;

/// Sending half handed to producer tasks
pub type SourceSender = UnboundedSender<SourceEvent>;

/// Drains the source channel and maintains InputState
pub struct InputCollector {
    state: InputState,
    receiver: UnboundedReceiver<SourceEvent>,
}

impl InputCollector {
    /// Creates a collector and the sender producers push into
    pub fn channel() -> (Self, SourceSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                state: InputState::new(),
                receiver,
            },
            sender,
        )
    }

    /// Applies a single source event to the state
    pub fn handle_source_event(&mut self, event: SourceEvent) {
        match event {
            SourceEvent::HandFrame { fingers_extended } => {
                self.state.sample_gesture(fingers_extended);
            }

            SourceEvent::Transcript(text) => {
                debug!(transcript = %text, "Voice command received");
                self.state.utterances.push(text);
            }

            SourceEvent::Listening(listening) => {
                self.state.listening = listening;
            }

            SourceEvent::Available(source) => {
                info!(%source, "Input source available");
                self.set_available(source, true);
            }

            SourceEvent::Unavailable { source, reason } => {
                warn!(%source, %reason, "Input source unavailable");
                self.set_available(source, false);
                if source == SourceKind::Speech {
                    self.state.listening = false;
                }
            }
        }
    }

    fn set_available(&mut self, source: SourceKind, available: bool) {
        match source {
            SourceKind::Gesture => self.state.gesture_available = available,
            SourceKind::Speech => self.state.speech_available = available,
        }
    }

    /// Applies every queued source event; returns how many were read
    pub fn collect(&mut self, now: Instant) -> usize {
        self.state.now = Some(now);

        let mut count = 0;
        while let Ok(event) = self.receiver.try_recv() {
            self.handle_source_event(event);
            count += 1;
        }
        count
    }

    /// Advance to next frame (transitions edge states to steady states)
    pub fn advance_frame(&mut self) {
        self.state.advance_frame();
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Clone current state for processing
    ///
    /// Levels and availability persist across frames, so the collector keeps its copy.
    pub fn clone_state(&self) -> InputState {
        self.state.clone()
    }
}
