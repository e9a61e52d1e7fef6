//! Game session
//!
//! The single consumer of every input source. Once per frame the session
//! drains the source channel, routes input to handlers, applies assistant
//! replies, advances the world and publishes a [`SessionSnapshot`] for the
//! renderer.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::assistant::{
    AccentColor, Assistant, AssistantDispatcher, ConversationHistory, Effect, Message, Reply,
    TextGenerator,
};
use crate::config::AppConfig;
use crate::input::{
    GestureHandler, HandIndicator, InputAction, InputCollector, InputContext, SourceSender,
    VoiceHandler,
};
use crate::sim::{RunnerSnapshot, World};

/// Fixed-length "resetting" flag whose rising edge resets the runner once
#[derive(Debug, Clone)]
struct ResetPulse {
    duration: Duration,
    until: Option<Instant>,
    fired: bool,
}

impl ResetPulse {
    fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
            fired: false,
        }
    }

    /// Raises the flag; ignored while a pulse is still raised
    fn trigger(&mut self, now: Instant) -> bool {
        if self.is_active(now) {
            return false;
        }
        self.until = Some(now + self.duration);
        self.fired = false;
        true
    }

    /// True exactly once per pulse
    fn take_edge(&mut self) -> bool {
        if self.until.is_some() && !self.fired {
            self.fired = true;
            return true;
        }
        false
    }

    fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    fn expire(&mut self, now: Instant) {
        if self.fired && !self.is_active(now) {
            self.until = None;
        }
    }
}

/// Source availability shown in the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceStatus {
    pub gesture_available: bool,
    pub speech_available: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub runner: RunnerSnapshot,
    pub accent_color: AccentColor,
    pub listening: bool,
    pub resetting: bool,
    pub hand: HandIndicator,
    pub sources: SourceStatus,
    pub history: Vec<Message>,
    /// Messages appended since the session started, including evicted ones
    pub message_count: u64,
    pub paused: bool,
    /// Assistant requests still waiting for a reply
    pub pending_replies: usize,
}

/// Owns the world, the input pipeline and the assistant state
pub struct Session {
    world: World,
    collector: InputCollector,
    context: InputContext,
    events: SourceSender,
    dispatcher: AssistantDispatcher,
    history: ConversationHistory,
    message_count: u64,
    accent_color: AccentColor,
    reset_pulse: ResetPulse,
    pending_jump: bool,
}

impl Session {
    /// Builds a session on the current tokio runtime
    pub fn new(
        config: &AppConfig,
        generator: Arc<dyn TextGenerator>,
        seed: u64,
    ) -> Result<Self, tokio::runtime::TryCurrentError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(config, generator, seed, runtime))
    }

    pub fn with_runtime(
        config: &AppConfig,
        generator: Arc<dyn TextGenerator>,
        seed: u64,
        runtime: Handle,
    ) -> Self {
        let (collector, events) = InputCollector::channel();

        let mut context = InputContext::new();
        context.register_handler(Box::new(GestureHandler::new(config.input.jump_cooldown())));
        context.register_handler(Box::new(VoiceHandler::new()));

        let default_color = config.default_color();
        let assistant = Assistant::new(
            generator,
            config.assistant.timeout(),
            default_color.clone(),
        );

        info!(seed, generator = assistant.generator().name(), "Session created");

        Self {
            world: World::with_config(config.runner.clone(), seed),
            collector,
            context,
            events,
            dispatcher: AssistantDispatcher::new(Arc::new(assistant), runtime),
            history: ConversationHistory::with_capacity(config.history.capacity),
            message_count: 0,
            accent_color: default_color,
            reset_pulse: ResetPulse::new(config.input.reset_pulse()),
            pending_jump: false,
        }
    }

    /// Sender for producer tasks feeding this session
    pub fn source_sender(&self) -> SourceSender {
        self.events.clone()
    }

    /// Runs one frame and returns what to draw
    pub fn frame(&mut self, now: Instant) -> SessionSnapshot {
        self.collector.collect(now);
        self.context.update_state(self.collector.clone_state());
        self.context.process();

        for action in self.context.take_actions() {
            match action {
                InputAction::Jump => self.pending_jump = true,
                InputAction::Command(text) => self.submit_utterance(text),
            }
        }

        for reply in self.dispatcher.collect_ready() {
            self.apply_reply(reply, now);
        }

        if self.reset_pulse.take_edge() {
            info!(score = self.world.runner().display_score(), "Game reset by voice command");
            self.world.runner_mut().reset();
        }
        self.reset_pulse.expire(now);

        if std::mem::take(&mut self.pending_jump) && self.world.runner_mut().jump() {
            debug!("Jump applied");
        }

        let events = self.world.tick();
        if events.collided {
            info!(
                score = self.world.runner().display_score(),
                best = self.world.runner().best_score(),
                "Game over"
            );
        }

        let snapshot = self.snapshot(now);
        self.collector.advance_frame();
        snapshot
    }

    /// Logs the command and sends it to the assistant
    pub fn submit_utterance(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.history.push_user(text.clone());
        self.message_count += 1;
        self.dispatcher.dispatch(text);
    }

    /// Immediate reset, independent of the voice pulse
    pub fn request_reset(&mut self) {
        info!("Game reset requested");
        self.world.runner_mut().reset();
    }

    pub fn toggle_pause(&mut self) {
        self.world.toggle_pause();
        info!(paused = self.world.is_paused(), "Pause toggled");
    }

    fn apply_reply(&mut self, reply: Reply, now: Instant) {
        match &reply.effect {
            Effect::None => {}
            Effect::SetColor(color) => {
                info!(color = %color, "Accent color changed");
                self.accent_color = color.clone();
            }
            Effect::ResetGame => {
                if !self.reset_pulse.trigger(now) {
                    debug!("Reset already in progress");
                }
            }
        }
        self.history.push_jarvis(reply.feedback);
        self.message_count += 1;
    }

    /// Waits for outstanding assistant replies and applies them
    pub async fn flush_replies(&mut self, now: Instant) {
        for reply in self.dispatcher.wait_idle().await {
            self.apply_reply(reply, now);
        }
    }

    pub fn snapshot(&self, now: Instant) -> SessionSnapshot {
        let state = self.collector.state();
        SessionSnapshot {
            runner: self.world.runner().snapshot(),
            accent_color: self.accent_color.clone(),
            listening: state.listening,
            resetting: self.reset_pulse.is_active(now),
            hand: state.hand_indicator(),
            sources: SourceStatus {
                gesture_available: state.gesture_available,
                speech_available: state.speech_available,
            },
            history: self.history.to_vec(),
            message_count: self.message_count,
            paused: self.world.is_paused(),
            pending_replies: self.dispatcher.in_flight(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn accent_color(&self) -> &AccentColor {
        &self.accent_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::ScriptedGenerator;
    use crate::input::SourceEvent;

    fn session(responses: Vec<Result<&str, &str>>) -> Session {
        let config = AppConfig::default();
        Session::new(&config, Arc::new(ScriptedGenerator::new(responses)), 7).unwrap()
    }

    fn hand(session: &Session, open: bool) {
        session
            .source_sender()
            .send(SourceEvent::HandFrame {
                fingers_extended: open,
            })
            .unwrap();
    }

    #[test]
    fn test_reset_pulse_fires_once() {
        let mut pulse = ResetPulse::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(pulse.trigger(start));
        assert!(pulse.take_edge());
        assert!(!pulse.take_edge());
        assert!(pulse.is_active(start + Duration::from_millis(499)));
        assert!(!pulse.trigger(start + Duration::from_millis(200)));

        let later = start + Duration::from_millis(500);
        pulse.expire(later);
        assert!(!pulse.is_active(later));
        assert!(pulse.trigger(later));
    }

    #[tokio::test]
    async fn test_gesture_jumps_once_per_edge() {
        let mut session = session(vec![]);
        let start = Instant::now();

        hand(&session, true);
        let snapshot = session.frame(start);
        assert_eq!(snapshot.hand, HandIndicator::Detected);
        assert!(session.world().runner().state().vertical_offset < 0.0);

        // A held open palm lands and stays grounded
        for i in 1..=60 {
            hand(&session, true);
            session.frame(start + Duration::from_millis(i * 16));
        }
        assert!(session.world().runner().state().is_grounded());
        assert_eq!(session.world().runner().state().vertical_velocity, 0.0);

        hand(&session, false);
        hand(&session, true);
        session.frame(start + Duration::from_millis(61 * 16));
        assert!(session.world().runner().state().vertical_offset < 0.0);
    }

    #[tokio::test]
    async fn test_typed_command_round_trip() {
        let mut session = session(vec![Ok("#ffd700")]);
        let now = Instant::now();

        session.submit_utterance("make the theme gold");
        session.flush_replies(now).await;

        let snapshot = session.snapshot(now);
        assert_eq!(snapshot.accent_color.as_str(), "#ffd700");
        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.message_count, 2);
        assert_eq!(snapshot.history[0].text, "make the theme gold");
        assert_eq!(
            snapshot.history[1].text,
            "Neural interface recalibrated to #ffd700. Aesthetics updated."
        );
    }

    #[tokio::test]
    async fn test_voice_reset_resets_runner() {
        let mut session = session(vec![]);
        let start = Instant::now();

        for i in 0..30 {
            session.frame(start + Duration::from_millis(i * 16));
        }
        assert_eq!(session.world().runner().state().score, 30);

        session.submit_utterance("reset game");
        let now = start + Duration::from_secs(1);
        session.flush_replies(now).await;
        assert!(session.snapshot(now).resetting);

        let snapshot = session.frame(now);
        assert!(snapshot.resetting);
        // Reset then one tick
        assert_eq!(snapshot.runner.score, 1);

        let snapshot = session.frame(now + Duration::from_millis(100));
        assert_eq!(snapshot.runner.score, 2);

        let snapshot = session.frame(now + Duration::from_millis(600));
        assert!(!snapshot.resetting);
        assert_eq!(snapshot.runner.score, 3);
    }

    #[tokio::test]
    async fn test_pause_freezes_runner() {
        let mut session = session(vec![]);
        let now = Instant::now();

        session.frame(now);
        session.toggle_pause();
        let snapshot = session.frame(now);
        assert!(snapshot.paused);
        assert_eq!(snapshot.runner.score, 1);

        session.request_reset();
        assert_eq!(session.world().runner().state().score, 0);
    }
}
