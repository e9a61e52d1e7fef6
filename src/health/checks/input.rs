//! Input fusion health check

use std::time::{Duration, Instant};

use crate::health::check::{CheckLog, CheckResult, SystemCheck};
use crate::input::{
    GestureHandler, HandLandmarks, InputAction, InputCollector, InputContext, OpenPalmClassifier,
    SourceEvent, VoiceHandler,
};

/// Feeds synthetic hand frames and transcripts through the input pipeline
pub struct InputCheck {
    cooldown: Duration,
}

impl InputCheck {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }
}

impl Default for InputCheck {
    fn default() -> Self {
        Self::new(Duration::from_millis(300))
    }
}

impl SystemCheck for InputCheck {
    fn name(&self) -> &'static str {
        "Input"
    }

    fn description(&self) -> Option<&'static str> {
        Some("Gesture classification, debounce and voice routing")
    }

    fn check(&self) -> CheckResult {
        let mut log = CheckLog::new();

        let classifier = OpenPalmClassifier;
        log.record(
            classifier.fingers_extended(Some(&HandLandmarks::open_palm())),
            "Open palm classified as extended",
        );
        log.record(
            !classifier.fingers_extended(Some(&HandLandmarks::fist()))
                && !classifier.fingers_extended(None),
            "Fist and missing hand classified as closed",
        );

        let (mut collector, events) = InputCollector::channel();
        let mut context = InputContext::new();
        context.register_handler(Box::new(GestureHandler::new(self.cooldown)));
        context.register_handler(Box::new(VoiceHandler::new()));

        let start = Instant::now();
        let mut frame = |collector: &mut InputCollector, at: Instant, sent: &[SourceEvent]| {
            for event in sent {
                let _ = events.send(event.clone());
            }
            collector.collect(at);
            context.update_state(collector.clone_state());
            context.process();
            collector.advance_frame();
            context.take_actions()
        };

        let open = SourceEvent::HandFrame {
            fingers_extended: true,
        };
        let closed = SourceEvent::HandFrame {
            fingers_extended: false,
        };

        let first = frame(&mut collector, start, std::slice::from_ref(&open));
        log.record(first == [InputAction::Jump], "Rising edge requests a jump");

        let held = frame(&mut collector, start, std::slice::from_ref(&open));
        log.record(held.is_empty(), "Held palm does not repeat the jump");

        let bounced = frame(&mut collector, start, &[closed, open]);
        log.record(bounced.is_empty(), "Re-open inside cooldown is suppressed");

        let spoken = frame(
            &mut collector,
            start + self.cooldown,
            &[SourceEvent::Transcript("  reset game ".to_string())],
        );
        log.record(
            spoken == [InputAction::Command("reset game".to_string())],
            "Transcript routed as a trimmed command",
        );

        log.finish(format!("{} handlers registered", context.handler_count()))
    }
}
