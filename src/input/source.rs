//! Producer task ownership

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::collector::SourceSender;
use super::events::{SourceEvent, SourceKind};

/// Errors starting an input engine
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0} input is not supported here")]
    Unsupported(SourceKind),

    #[error("failed to start {kind} engine: {reason}")]
    Start { kind: SourceKind, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Scoped owner of a producer task
///
/// [`SourceHandle::shutdown`] asks the task to release its engine and waits
/// for it. Dropping the handle without shutting down aborts the task.
pub struct SourceHandle {
    kind: SourceKind,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SourceHandle {
    pub(crate) fn new(
        kind: SourceKind,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            kind,
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Whether the producer already exited on its own
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Signals the producer and waits until it has released its engine
    pub async fn shutdown(mut self) {
        if let Some(signal) = self.shutdown.take() {
            // The task may have exited already
            let _ = signal.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(()) => debug!(source = %self.kind, "Input source stopped"),
                Err(e) => warn!(source = %self.kind, error = %e, "Input source task failed"),
            }
        }
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Publishes that a producer could not be started
pub fn report_unavailable(events: &SourceSender, kind: SourceKind, reason: impl Into<String>) {
    let _ = events.send(SourceEvent::Unavailable {
        source: kind,
        reason: reason.into(),
    });
}
