//! End-to-end session behavior through the public API

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::FutureExt;
use futures::future::BoxFuture;
use neural_runner::assistant::{AccentColor, AssistantError, Role, TextGenerator};
use neural_runner::config::AppConfig;
use neural_runner::input::{SourceEvent, SourceKind};
use neural_runner::session::Session;

/// Answers every prompt with the same text and remembers the prompts
struct EchoGenerator {
    answer: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl EchoGenerator {
    fn new(answer: Result<&str, &str>) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.map(str::to_string).map_err(str::to_string),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

impl TextGenerator for EchoGenerator {
    fn name(&self) -> &str {
        "echo"
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AssistantError>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let answer = self.answer.clone().map_err(AssistantError::Unavailable);
        async move { answer }.boxed()
    }
}

fn session(generator: Arc<EchoGenerator>) -> Session {
    Session::new(&AppConfig::default(), generator, 11).unwrap()
}

#[tokio::test]
async fn test_color_command_recolors_hud() {
    let generator = EchoGenerator::new(Ok("  #39ff14 \n"));
    let mut session = session(generator.clone());
    let start = Instant::now();

    session
        .source_sender()
        .send(SourceEvent::Transcript("make the theme green".to_string()))
        .unwrap();
    session.frame(start);
    session.flush_replies(start).await;

    assert_eq!(session.accent_color(), &AccentColor::parse("#39ff14").unwrap());
    assert_eq!(generator.prompts.lock().unwrap().len(), 1);

    let messages = session.history().to_vec();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].text, "make the theme green");
    assert_eq!(messages[1].role, Role::Jarvis);
    assert!(messages[1].text.contains("#39ff14"));
}

#[tokio::test]
async fn test_failed_color_request_reverts_to_default() {
    let mut session = session(EchoGenerator::new(Err("offline")));
    let start = Instant::now();

    session.submit_utterance("change color to red");
    session.flush_replies(start).await;

    assert_eq!(session.accent_color(), &AccentColor::default());
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_reset_command_restarts_runner_once() {
    let generator = EchoGenerator::new(Ok("unused"));
    let mut session = session(generator.clone());
    let start = Instant::now();

    for i in 0..20 {
        session.frame(start + Duration::from_millis(i * 16));
    }
    assert_eq!(session.world().runner().state().score, 20);

    session.submit_utterance("Reset game");
    session.flush_replies(start).await;

    let snapshot = session.frame(start + Duration::from_millis(400));
    assert!(snapshot.resetting);
    // Reset happens before the tick, so the new run is one frame old
    assert_eq!(snapshot.runner.score, 1);

    let later = session.frame(start + Duration::from_secs(2));
    assert!(!later.resetting);
    assert_eq!(later.runner.score, 2);
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_open_palm_jumps_and_sources_report() {
    let mut session = session(EchoGenerator::new(Ok("Hello.")));
    let events = session.source_sender();
    let start = Instant::now();

    events.send(SourceEvent::Available(SourceKind::Gesture)).unwrap();
    events
        .send(SourceEvent::HandFrame {
            fingers_extended: true,
        })
        .unwrap();
    let snapshot = session.frame(start);

    assert!(snapshot.sources.gesture_available);
    assert!(!snapshot.sources.speech_available);
    assert!(!session.world().runner().state().is_grounded());
}

#[tokio::test]
async fn test_general_question_is_answered() {
    let mut session = session(EchoGenerator::new(Ok("  All systems nominal.  ")));
    let start = Instant::now();

    session.submit_utterance("status report");
    session.flush_replies(start).await;

    let snapshot = session.snapshot(start);
    assert_eq!(snapshot.message_count, 2);
    assert_eq!(snapshot.pending_replies, 0);
    assert_eq!(snapshot.history[1].text, "All systems nominal.");
}
