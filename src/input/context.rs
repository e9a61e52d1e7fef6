//! Input event routing and distribution

use tracing::trace;

use super::events::{InputAction, InputEvent, SourceKind};
use super::handler::InputHandler;
use super::state::{GestureEdge, InputState};

/// Central input routing and distribution system
pub struct InputContext {
    /// Registered input handlers, sorted by priority (highest first)
    handlers: Vec<Box<dyn InputHandler>>,
    state: InputState,
    prev_state: InputState,
    /// Debug: Events generated last frame
    last_events: Vec<String>,
}

impl InputContext {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            state: InputState::new(),
            prev_state: InputState::new(),
            last_events: Vec::new(),
        }
    }

    /// Register an input handler
    ///
    /// Handlers are automatically sorted by priority (highest first).
    pub fn register_handler(&mut self, handler: Box<dyn InputHandler>) {
        self.handlers.push(handler);
        self.handlers
            .sort_by_key(|h| std::cmp::Reverse(h.priority()));
    }

    /// Update input state from collector
    pub fn update_state(&mut self, state: InputState) {
        self.prev_state = std::mem::replace(&mut self.state, state);
    }

    /// Process input and dispatch events to handlers
    ///
    /// Call this once per frame after updating state.
    pub fn process(&mut self) {
        self.last_events.clear();

        for handler in &mut self.handlers {
            handler.begin_frame();
        }

        let events = self.generate_events();

        for event in &events {
            trace!(?event, "Input event");
            self.last_events.push(format!("{:?}", event));
        }

        for event in events {
            for handler in &mut self.handlers {
                if handler.handle_event(&event, &self.state) {
                    break;
                }
            }
        }

        for handler in &mut self.handlers {
            handler.update(&self.state);
        }
    }

    /// Generate semantic events from state changes
    fn generate_events(&self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for edge in &self.state.gesture_edges {
            events.push(match edge {
                GestureEdge::Rising => InputEvent::GestureStarted,
                GestureEdge::Falling => InputEvent::GestureEnded,
            });
        }

        for text in &self.state.utterances {
            events.push(InputEvent::Utterance(text.clone()));
        }

        if self.state.listening != self.prev_state.listening {
            events.push(InputEvent::ListeningChanged(self.state.listening));
        }

        if self.state.gesture_available != self.prev_state.gesture_available {
            events.push(InputEvent::SourceChanged {
                source: SourceKind::Gesture,
                available: self.state.gesture_available,
            });
        }

        if self.state.speech_available != self.prev_state.speech_available {
            events.push(InputEvent::SourceChanged {
                source: SourceKind::Speech,
                available: self.state.speech_available,
            });
        }

        events
    }

    /// Collects actions from every handler, highest priority first
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        self.handlers
            .iter_mut()
            .flat_map(|h| h.take_actions())
            .collect()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Get a reference to a handler by name
    pub fn get_handler(&self, name: &str) -> Option<&dyn InputHandler> {
        self.handlers
            .iter()
            .find(|h| h.name() == name)
            .map(|b| b.as_ref())
    }

    /// Get debug information about all handlers
    pub fn debug_handlers(&self) -> Vec<(String, u32)> {
        self.handlers
            .iter()
            .map(|h| (h.name().to_string(), h.priority()))
            .collect()
    }

    /// Get events generated last frame (for debugging)
    pub fn debug_last_events(&self) -> &[String] {
        &self.last_events
    }
}

impl Default for InputContext {
    fn default() -> Self {
        Self::new()
    }
}
