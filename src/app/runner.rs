//! Frame loop for the terminal and headless front ends

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn};

use super::terminal::TerminalRenderer;
use crate::assistant::{GeminiClient, TextGenerator, UnavailableGenerator};
use crate::config::{AppConfig, AssistantConfig};
use crate::error::Result;
use crate::input::{
    ChannelHandTracker, ChannelRecognizer, HandIndicator, HandLandmarks, LineRecognizer,
    RecognizerEvent, SourceKind, SpeechRecognizer, report_unavailable, spawn_gesture_source,
    spawn_speech_source,
};
use crate::session::{Session, SessionSnapshot};

/// Picks the text generator for the configured service
///
/// Without an API key the assistant still answers, using its fallback lines.
pub fn build_generator(config: &AssistantConfig) -> Arc<dyn TextGenerator> {
    let Some(api_key) = config.resolve_api_key() else {
        warn!(
            env = %config.api_key_env,
            "No API key configured, assistant replies will use fallbacks"
        );
        return Arc::new(UnavailableGenerator::new(format!(
            "{} is not set",
            config.api_key_env
        )));
    };

    match GeminiClient::new(config, api_key) {
        Ok(client) => {
            info!(model = %config.model, "Text generation enabled");
            Arc::new(client)
        }
        Err(e) => {
            warn!(error = %e, "Failed to build text generation client");
            Arc::new(UnavailableGenerator::new(e.to_string()))
        }
    }
}

/// How a headless run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    /// Conversation messages logged, user and assistant
    pub messages: u64,
    pub score: u64,
    pub best_score: u64,
}

/// Main game application
pub struct App {
    config: AppConfig,
    seed: u64,
    generator: Arc<dyn TextGenerator>,
}

impl App {
    /// Creates a new game application with the provided configuration
    pub fn new(config: AppConfig, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        info!(profile = %config.profile, seed, "Starting game");
        info!(fps = config.frame.fps, "Frame configuration");

        let generator = build_generator(&config.assistant);
        Self {
            config,
            seed,
            generator,
        }
    }

    /// Replaces the text generator
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn frame_interval(&self) -> Interval {
        let mut interval = tokio::time::interval(self.config.frame.frame_duration());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }

    /// Runs without a terminal UI: stdin lines are voice commands
    ///
    /// Stops after `max_frames`, or when stdin closes and no reply is pending.
    pub async fn run_headless(&self, max_frames: Option<u64>) -> Result<RunSummary> {
        self.run_headless_with(Box::new(LineRecognizer::stdin()), max_frames)
            .await
    }

    /// Headless loop driven by any recognizer
    pub async fn run_headless_with(
        &self,
        recognizer: Box<dyn SpeechRecognizer>,
        max_frames: Option<u64>,
    ) -> Result<RunSummary> {
        let mut session = Session::new(&self.config, Arc::clone(&self.generator), self.seed)?;
        let events = session.source_sender();

        report_unavailable(&events, SourceKind::Gesture, "no camera in headless mode");
        let speech = spawn_speech_source(
            recognizer,
            self.config.input.speech_restart_delay(),
            events,
            &Handle::current(),
        );

        let mut interval = self.frame_interval();
        let report_every = u64::from(self.config.frame.fps.max(1));
        let mut frames = 0;
        let mut printed = 0;

        loop {
            interval.tick().await;
            // Sampled before the frame so its collect sees everything the source sent
            let input_closed = speech.is_finished();
            let snapshot = session.frame(Instant::now());
            frames += 1;
            printed = print_new_messages(&snapshot, printed);

            if frames % report_every == 0 {
                info!(
                    frame = frames,
                    score = snapshot.runner.display_score,
                    best = snapshot.runner.best_score,
                    running = snapshot.runner.running,
                    obstacles = snapshot.runner.obstacles.len(),
                    "Status"
                );
            }

            if max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            if input_closed && snapshot.pending_replies == 0 {
                info!("Input closed");
                break;
            }
        }

        session.flush_replies(Instant::now()).await;
        let snapshot = session.snapshot(Instant::now());
        print_new_messages(&snapshot, printed);
        speech.shutdown().await;

        let runner = session.world().runner();
        let summary = RunSummary {
            frames,
            messages: snapshot.message_count,
            score: runner.display_score(),
            best_score: runner.best_score(),
        };
        info!(?summary, "Headless run finished");
        Ok(summary)
    }

    /// Runs the interactive terminal front end until Esc
    ///
    /// The keyboard stands in for the camera and microphone.
    pub async fn run_terminal(&self) -> Result<()> {
        let mut session = Session::new(&self.config, Arc::clone(&self.generator), self.seed)?;
        let events = session.source_sender();
        let runtime = Handle::current();

        let (tracker, hand_frames) = ChannelHandTracker::new();
        let mut hand = KeyboardHand::new(hand_frames);
        let gesture = spawn_gesture_source(Box::new(tracker), events.clone(), &runtime);

        let (recognizer, speech_feed) = ChannelRecognizer::new();
        let speech = spawn_speech_source(
            Box::new(recognizer),
            self.config.input.speech_restart_delay(),
            events,
            &runtime,
        );

        let mut renderer = TerminalRenderer::enter()?;
        let mut keys = EventStream::new();
        let mut interval = self.frame_interval();
        let mut input_line = String::new();

        let result = loop {
            tokio::select! {
                _ = interval.tick() => {
                    let snapshot = session.frame(Instant::now());
                    hand.after_frame(&snapshot);
                    if let Err(e) = renderer.draw(&snapshot, &input_line) {
                        break Err(e);
                    }
                }
                key = keys.next() => match key {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        let controls = KeyControls {
                            session: &mut session,
                            hand: &mut hand,
                            speech_feed: &speech_feed,
                            input_line: &mut input_line,
                        };
                        if controls.handle(key) == KeyOutcome::Quit {
                            break Ok(());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e),
                    None => break Ok(()),
                },
            }
        };

        drop(renderer);
        gesture.shutdown().await;
        speech.shutdown().await;
        info!("Terminal session closed");

        result?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

/// Open palm raised by a key press and lowered once a frame has seen it
struct KeyboardHand {
    frames: UnboundedSender<Option<HandLandmarks>>,
    raised: bool,
}

impl KeyboardHand {
    fn new(frames: UnboundedSender<Option<HandLandmarks>>) -> Self {
        Self {
            frames,
            raised: false,
        }
    }

    fn raise(&mut self) {
        if !self.raised && self.frames.send(Some(HandLandmarks::open_palm())).is_ok() {
            self.raised = true;
        }
    }

    /// Lowers the palm after the first frame that showed it detected
    fn after_frame(&mut self, snapshot: &SessionSnapshot) {
        if self.raised && snapshot.hand == HandIndicator::Detected {
            let _ = self.frames.send(None);
            self.raised = false;
        }
    }
}

/// Keyboard stand-ins for the gesture and speech engines
struct KeyControls<'a> {
    session: &'a mut Session,
    hand: &'a mut KeyboardHand,
    speech_feed: &'a UnboundedSender<RecognizerEvent>,
    input_line: &'a mut String,
}

impl KeyControls<'_> {
    fn handle(self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyOutcome::Quit;
            }
            KeyCode::Up | KeyCode::Tab => self.hand.raise(),
            KeyCode::F(2) => self.session.toggle_pause(),
            KeyCode::F(5) => self.session.request_reset(),
            KeyCode::Enter => {
                let text = std::mem::take(self.input_line);
                if !text.trim().is_empty() {
                    let _ = self.speech_feed.send(RecognizerEvent::Transcript(text));
                }
            }
            KeyCode::Backspace => {
                self.input_line.pop();
            }
            KeyCode::Char(c) => self.input_line.push(c),
            _ => {}
        }
        KeyOutcome::Continue
    }
}

/// Prints messages appended since `printed`; returns the new count
fn print_new_messages(snapshot: &SessionSnapshot, printed: u64) -> u64 {
    let new = (snapshot.message_count - printed).min(snapshot.history.len() as u64) as usize;
    let start = snapshot.history.len() - new;
    for message in &snapshot.history[start..] {
        println!(
            "[{}] {}: {}",
            message.time_label(),
            message.role.label(),
            message.text
        );
    }
    snapshot.message_count
}
