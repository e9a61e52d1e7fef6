//! Input handlers

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::events::{InputAction, InputEvent};
use super::state::InputState;

/// Trait for subsystems that handle input
///
/// Handlers are called in priority order (highest first).
/// When a handler consumes an event (returns true), propagation stops.
pub trait InputHandler: Send {
    /// Name of this handler for debugging
    fn name(&self) -> &str;

    /// Priority for input routing (higher = earlier)
    ///
    /// Priority ranges:
    /// - 100+: Overrides (replay, scripted input)
    /// - 50-99: Game and voice handlers
    /// - 0-49: Fallback handlers
    fn priority(&self) -> u32;

    /// Handle an input event
    ///
    /// # Returns
    /// * `true` if the event was consumed (stops propagation to lower priority handlers)
    /// * `false` if the event was not handled (continues to next handler)
    fn handle_event(&mut self, event: &InputEvent, state: &InputState) -> bool;

    /// Called every frame with current input state, after all events are processed
    fn update(&mut self, _state: &InputState) {}

    /// Called at the start of each frame, before events are generated
    fn begin_frame(&mut self) {}

    /// Actions produced since the last call
    fn take_actions(&mut self) -> Vec<InputAction> {
        Vec::new()
    }
}

/// Turns gesture rising edges into debounced jump requests
pub struct GestureHandler {
    cooldown: Duration,
    last_jump: Option<Instant>,
    actions: Vec<InputAction>,
    suppressed: u64,
}

impl GestureHandler {
    pub const NAME: &'static str = "gesture";

    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_jump: None,
            actions: Vec::new(),
            suppressed: 0,
        }
    }

    /// Rising edges ignored because they fell inside the cooldown window
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    fn cooling_down(&self, now: Instant) -> bool {
        self.last_jump
            .is_some_and(|last| now.saturating_duration_since(last) < self.cooldown)
    }
}

impl InputHandler for GestureHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        60
    }

    fn handle_event(&mut self, event: &InputEvent, state: &InputState) -> bool {
        match event {
            InputEvent::GestureStarted => {
                let Some(now) = state.now else {
                    return true;
                };

                if self.cooling_down(now) {
                    self.suppressed += 1;
                    trace!(suppressed = self.suppressed, "Gesture within cooldown");
                } else {
                    debug!("Jump gesture");
                    self.last_jump = Some(now);
                    self.actions.push(InputAction::Jump);
                }
                true
            }
            InputEvent::GestureEnded => true,
            _ => false,
        }
    }

    fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.actions)
    }
}

/// Forwards finalized utterances as assistant commands
#[derive(Default)]
pub struct VoiceHandler {
    actions: Vec<InputAction>,
}

impl VoiceHandler {
    pub const NAME: &'static str = "voice";

    pub fn new() -> Self {
        Self::default()
    }
}

impl InputHandler for VoiceHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        50
    }

    fn handle_event(&mut self, event: &InputEvent, _state: &InputState) -> bool {
        match event {
            InputEvent::Utterance(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.actions.push(InputAction::Command(text.to_string()));
                }
                true
            }
            _ => false,
        }
    }

    fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.actions)
    }
}
