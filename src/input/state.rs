//! Per-frame input state

use std::time::Instant;

use super::events::HandIndicator;

/// Boolean signal level with edge detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalState {
    #[default]
    Low,
    /// Went high this frame (edge)
    Rising,
    /// High for more than one frame
    High,
    /// Went low this frame (edge)
    Falling,
}

impl SignalState {
    /// Advance state for next frame (transitions edges to steady states)
    pub fn advance(self) -> Self {
        match self {
            Self::Rising => Self::High,
            Self::Falling => Self::Low,
            state => state,
        }
    }

    /// Applies a new sample, returning the new state and whether it changed level
    pub fn sample(self, level: bool) -> (Self, bool) {
        match (self.is_high(), level) {
            (false, true) => (Self::Rising, true),
            (true, false) => (Self::Falling, true),
            _ => (self, false),
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Self::Rising | Self::High)
    }

    pub fn is_rising(self) -> bool {
        matches!(self, Self::Rising)
    }
}

/// Gesture level transition observed between two frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEdge {
    Rising,
    Falling,
}

/// Input state snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Latest fingers-extended level
    pub gesture: SignalState,
    /// Every gesture transition since the previous frame, in arrival order
    pub gesture_edges: Vec<GestureEdge>,
    /// Finalized utterances since the previous frame
    pub utterances: Vec<String>,
    pub listening: bool,
    pub gesture_available: bool,
    pub speech_available: bool,
    /// Time the frame was collected
    pub now: Option<Instant>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one hand frame classification
    pub fn sample_gesture(&mut self, fingers_extended: bool) {
        let (next, changed) = self.gesture.sample(fingers_extended);
        self.gesture = next;
        if changed {
            self.gesture_edges.push(if fingers_extended {
                GestureEdge::Rising
            } else {
                GestureEdge::Falling
            });
        }
    }

    pub fn hand_indicator(&self) -> HandIndicator {
        if self.gesture.is_high() {
            HandIndicator::Detected
        } else {
            HandIndicator::Idle
        }
    }

    /// Clears per-frame data and settles edge states
    pub fn advance_frame(&mut self) {
        self.gesture = self.gesture.advance();
        self.gesture_edges.clear();
        self.utterances.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_edges() {
        let (state, changed) = SignalState::Low.sample(true);
        assert_eq!(state, SignalState::Rising);
        assert!(changed);

        let (state, changed) = state.advance().sample(true);
        assert_eq!(state, SignalState::High);
        assert!(!changed);

        let (state, changed) = state.sample(false);
        assert_eq!(state, SignalState::Falling);
        assert!(changed);
        assert_eq!(state.advance(), SignalState::Low);
    }

    #[test]
    fn test_sustained_gesture_records_one_edge() {
        let mut state = InputState::new();
        for _ in 0..5 {
            state.sample_gesture(true);
        }
        assert_eq!(state.gesture_edges, vec![GestureEdge::Rising]);
        assert_eq!(state.hand_indicator(), HandIndicator::Detected);

        state.advance_frame();
        state.sample_gesture(true);
        assert!(state.gesture_edges.is_empty());
        assert_eq!(state.gesture, SignalState::High);
    }

    #[test]
    fn test_flicker_within_frame_keeps_order() {
        let mut state = InputState::new();
        state.sample_gesture(true);
        state.sample_gesture(false);
        state.sample_gesture(true);

        assert_eq!(
            state.gesture_edges,
            vec![GestureEdge::Rising, GestureEdge::Falling, GestureEdge::Rising]
        );
        assert!(state.gesture.is_rising());
    }

    #[test]
    fn test_advance_clears_frame_data() {
        let mut state = InputState::new();
        state.utterances.push("hello".to_string());
        state.sample_gesture(true);
        state.sample_gesture(false);
        state.advance_frame();

        assert!(state.utterances.is_empty());
        assert!(state.gesture_edges.is_empty());
        assert_eq!(state.gesture, SignalState::Low);
        assert_eq!(state.hand_indicator(), HandIndicator::Idle);
    }
}
