//! Speech producer
//!
//! Supervises a [`SpeechRecognizer`] so it keeps listening: transcripts are
//! republished as [`SourceEvent::Transcript`], listening state is tracked and
//! the recognizer is restarted whenever it ends on its own.

use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::collector::SourceSender;
use super::events::{SourceEvent, SourceKind};
use super::source::{SourceError, SourceHandle, report_unavailable};

/// Event emitted by a recognizer engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    Started,
    /// A finalized result
    Transcript(String),
    Error(String),
    /// Stopped listening, typically after silence
    Ended,
    /// The engine is gone and will not produce more events
    Closed,
}

/// Continuous speech-to-text engine
pub trait SpeechRecognizer: Send {
    fn name(&self) -> &str;

    /// Begins listening; may be called again after [`RecognizerEvent::Ended`]
    fn start(&mut self) -> Result<(), SourceError>;

    fn next_event(&mut self) -> BoxFuture<'_, RecognizerEvent>;

    /// Stops listening and releases the microphone
    fn stop(&mut self);
}

/// Runs a recognizer on the runtime and keeps it listening
pub fn spawn_speech_source(
    mut recognizer: Box<dyn SpeechRecognizer>,
    restart_delay: Duration,
    events: SourceSender,
    runtime: &Handle,
) -> SourceHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = runtime.spawn(async move {
        if let Err(e) = recognizer.start() {
            warn!(recognizer = recognizer.name(), error = %e, "Failed to start speech recognition");
            report_unavailable(&events, SourceKind::Speech, e.to_string());
            return;
        }
        info!(recognizer = recognizer.name(), "Speech source started");
        let _ = events.send(SourceEvent::Available(SourceKind::Speech));

        loop {
            let event = tokio::select! {
                _ = &mut shutdown_rx => break,
                event = recognizer.next_event() => event,
            };

            let published = match event {
                RecognizerEvent::Started => events.send(SourceEvent::Listening(true)),
                RecognizerEvent::Transcript(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    debug!(transcript = text, "Speech transcript");
                    events.send(SourceEvent::Transcript(text.to_string()))
                }
                RecognizerEvent::Error(error) => {
                    warn!(recognizer = recognizer.name(), %error, "Speech recognition error");
                    events.send(SourceEvent::Listening(false))
                }
                RecognizerEvent::Ended => {
                    let _ = events.send(SourceEvent::Listening(false));

                    tokio::select! {
                        _ = &mut shutdown_rx => break,
                        _ = tokio::time::sleep(restart_delay) => {}
                    }

                    if let Err(e) = recognizer.start() {
                        warn!(recognizer = recognizer.name(), error = %e, "Failed to restart speech recognition");
                        report_unavailable(&events, SourceKind::Speech, e.to_string());
                        break;
                    }
                    debug!("Speech recognition restarted");
                    Ok(())
                }
                RecognizerEvent::Closed => {
                    let _ = events.send(SourceEvent::Listening(false));
                    report_unavailable(&events, SourceKind::Speech, "recognizer closed");
                    break;
                }
            };

            if published.is_err() {
                debug!("Source channel closed");
                break;
            }
        }

        recognizer.stop();
        info!(recognizer = recognizer.name(), "Speech source released");
    });

    SourceHandle::new(SourceKind::Speech, shutdown_tx, task)
}

/// Recognizer driven through a channel of engine events
///
/// Each successful `start` queues a [`RecognizerEvent::Started`].
pub struct ChannelRecognizer {
    events: UnboundedReceiver<RecognizerEvent>,
    pending: VecDeque<RecognizerEvent>,
    start_failure: Option<String>,
    starts: u32,
}

impl ChannelRecognizer {
    pub fn new() -> (Self, UnboundedSender<RecognizerEvent>) {
        let (sender, events) = mpsc::unbounded_channel();
        (
            Self {
                events,
                pending: VecDeque::new(),
                start_failure: None,
                starts: 0,
            },
            sender,
        )
    }

    /// Recognizer whose every `start` fails with the given reason
    pub fn failing(reason: impl Into<String>) -> Self {
        let (mut recognizer, _sender) = Self::new();
        recognizer.start_failure = Some(reason.into());
        recognizer
    }

    pub fn starts(&self) -> u32 {
        self.starts
    }
}

impl SpeechRecognizer for ChannelRecognizer {
    fn name(&self) -> &str {
        "channel"
    }

    fn start(&mut self) -> Result<(), SourceError> {
        if let Some(reason) = &self.start_failure {
            return Err(SourceError::Start {
                kind: SourceKind::Speech,
                reason: reason.clone(),
            });
        }
        self.starts += 1;
        self.pending.push_back(RecognizerEvent::Started);
        Ok(())
    }

    fn next_event(&mut self) -> BoxFuture<'_, RecognizerEvent> {
        async move {
            if let Some(event) = self.pending.pop_front() {
                return event;
            }
            self.events.recv().await.unwrap_or(RecognizerEvent::Closed)
        }
        .boxed()
    }

    fn stop(&mut self) {
        self.events.close();
    }
}

/// Treats each line of a reader (stdin by default) as a finalized transcript
///
/// Lines are read on a detached thread, so a reader blocked with no input
/// never holds up the runtime's shutdown.
pub struct LineRecognizer {
    reader: Option<Box<dyn BufRead + Send>>,
    lines: Option<UnboundedReceiver<RecognizerEvent>>,
    started: bool,
}

impl LineRecognizer {
    pub fn new(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Some(Box::new(reader)),
            lines: None,
            started: false,
        }
    }

    pub fn stdin() -> Self {
        Self::new(io::BufReader::new(io::stdin()))
    }
}

fn forward_lines(reader: impl BufRead, sender: UnboundedSender<RecognizerEvent>) {
    for line in reader.lines() {
        let event = match line {
            Ok(line) => RecognizerEvent::Transcript(line),
            Err(e) => {
                let _ = sender.send(RecognizerEvent::Error(e.to_string()));
                break;
            }
        };
        if sender.send(event).is_err() {
            break;
        }
    }
}

impl SpeechRecognizer for LineRecognizer {
    fn name(&self) -> &str {
        "lines"
    }

    fn start(&mut self) -> Result<(), SourceError> {
        if let Some(reader) = self.reader.take() {
            let (sender, lines) = mpsc::unbounded_channel();
            thread::Builder::new()
                .name("line-reader".to_string())
                .spawn(move || forward_lines(reader, sender))?;
            self.lines = Some(lines);
        }
        self.started = true;
        Ok(())
    }

    fn next_event(&mut self) -> BoxFuture<'_, RecognizerEvent> {
        async move {
            if std::mem::take(&mut self.started) {
                return RecognizerEvent::Started;
            }
            let Some(lines) = self.lines.as_mut() else {
                return RecognizerEvent::Closed;
            };
            lines.recv().await.unwrap_or(RecognizerEvent::Closed)
        }
        .boxed()
    }

    fn stop(&mut self) {
        // The reader thread exits on its next send
        self.lines = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::input::InputCollector;

    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_transcripts_and_listening() {
        let (mut collector, events) = InputCollector::channel();
        let (recognizer, engine) = ChannelRecognizer::new();
        let handle = spawn_speech_source(
            Box::new(recognizer),
            Duration::from_millis(100),
            events,
            &Handle::current(),
        );

        engine
            .send(RecognizerEvent::Transcript("  change color to gold ".to_string()))
            .unwrap();
        engine
            .send(RecognizerEvent::Transcript("   ".to_string()))
            .unwrap();
        settle().await;

        collector.collect(Instant::now());
        let state = collector.state();
        assert!(state.speech_available);
        assert!(state.listening);
        assert_eq!(state.utterances, vec!["change color to gold".to_string()]);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_error_clears_listening() {
        let (mut collector, events) = InputCollector::channel();
        let (recognizer, engine) = ChannelRecognizer::new();
        let handle = spawn_speech_source(
            Box::new(recognizer),
            Duration::from_millis(100),
            events,
            &Handle::current(),
        );

        engine
            .send(RecognizerEvent::Error("network".to_string()))
            .unwrap();
        settle().await;

        collector.collect(Instant::now());
        assert!(!collector.state().listening);
        assert!(collector.state().speech_available);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_restarts_after_end() {
        let (mut collector, events) = InputCollector::channel();
        let (recognizer, engine) = ChannelRecognizer::new();
        let handle = spawn_speech_source(
            Box::new(recognizer),
            Duration::from_millis(100),
            events,
            &Handle::current(),
        );

        engine.send(RecognizerEvent::Ended).unwrap();
        settle().await;
        collector.collect(Instant::now());
        assert!(!collector.state().listening);

        tokio::time::sleep(Duration::from_millis(150)).await;
        settle().await;
        collector.collect(Instant::now());
        assert!(collector.state().listening);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_failure_reports_unavailable() {
        let (mut collector, events) = InputCollector::channel();
        let handle = spawn_speech_source(
            Box::new(ChannelRecognizer::failing("no microphone")),
            Duration::from_millis(100),
            events,
            &Handle::current(),
        );
        handle.shutdown().await;

        collector.collect(Instant::now());
        assert!(!collector.state().speech_available);
        assert!(!collector.state().listening);
    }

    #[tokio::test]
    async fn test_closed_engine_ends_source() {
        let (mut collector, events) = InputCollector::channel();
        let (recognizer, engine) = ChannelRecognizer::new();
        let handle = spawn_speech_source(
            Box::new(recognizer),
            Duration::from_millis(100),
            events,
            &Handle::current(),
        );

        drop(engine);
        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }
        handle.shutdown().await;

        collector.collect(Instant::now());
        assert!(!collector.state().speech_available);
    }

    #[tokio::test]
    async fn test_line_reader_publishes_lines_then_closes() {
        let (mut collector, events) = InputCollector::channel();
        let reader = io::Cursor::new("restart\n   \n change color to gold \n");
        let handle = spawn_speech_source(
            Box::new(LineRecognizer::new(reader)),
            Duration::from_millis(100),
            events,
            &Handle::current(),
        );

        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }
        handle.shutdown().await;

        collector.collect(Instant::now());
        let state = collector.state();
        assert_eq!(
            state.utterances,
            vec!["restart".to_string(), "change color to gold".to_string()]
        );
        assert!(!state.speech_available);
    }

    /// Reader that blocks forever, like stdin with nothing piped in
    struct SilentReader;

    impl io::Read for SilentReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            loop {
                thread::park();
            }
        }
    }

    #[test]
    fn test_blocked_reader_does_not_hold_runtime() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let (_collector, events) = InputCollector::channel();
            let handle = spawn_speech_source(
                Box::new(LineRecognizer::new(io::BufReader::new(SilentReader))),
                Duration::from_millis(100),
                events,
                &Handle::current(),
            );
            tokio::task::yield_now().await;
            handle.shutdown().await;
        });

        // Returns only if no task is stuck in a blocking read
        drop(runtime);
    }

    #[test]
    fn test_channel_recognizer_counts_starts() {
        let (mut recognizer, _engine) = ChannelRecognizer::new();
        recognizer.start().unwrap();
        recognizer.start().unwrap();
        assert_eq!(recognizer.starts(), 2);
        assert!(ChannelRecognizer::failing("x").start().is_err());
    }
}
