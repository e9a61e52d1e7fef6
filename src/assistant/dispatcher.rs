//! Background execution of assistant requests
//!
//! Each utterance becomes one task on a [`JoinSet`]. The frame loop polls for
//! finished replies without blocking; replies arrive in completion order, so
//! two overlapping commands may resolve out of submission order.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{debug, error};

use super::{Assistant, Reply};

/// Owns the in-flight assistant requests; dropping it aborts them
pub struct AssistantDispatcher {
    assistant: Arc<Assistant>,
    tasks: JoinSet<Reply>,
    runtime: Handle,
}

impl AssistantDispatcher {
    pub fn new(assistant: Arc<Assistant>, runtime: Handle) -> Self {
        Self {
            assistant,
            tasks: JoinSet::new(),
            runtime,
        }
    }

    /// Starts answering an utterance in the background
    pub fn dispatch(&mut self, utterance: String) {
        let assistant = Arc::clone(&self.assistant);
        debug!(utterance = %utterance, in_flight = self.tasks.len(), "Dispatching voice command");
        self.tasks
            .spawn_on(async move { assistant.respond(&utterance).await }, &self.runtime);
    }

    /// Replies that finished since the last call, without waiting
    pub fn collect_ready(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Some(result) = self.tasks.try_join_next() {
            match result {
                Ok(reply) => replies.push(reply),
                Err(e) => error!(error = %e, "Assistant task failed"),
            }
        }
        replies
    }

    /// Waits for every in-flight request to finish
    pub async fn wait_idle(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(reply) => replies.push(reply),
                Err(e) => error!(error = %e, "Assistant task failed"),
            }
        }
        replies
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::assistant::testing::{ScriptedGenerator, StalledGenerator};
    use crate::assistant::{AccentColor, Effect, TextGenerator};

    fn dispatcher(generator: Arc<dyn TextGenerator>) -> AssistantDispatcher {
        let assistant = Assistant::new(generator, Duration::from_secs(1), AccentColor::default());
        AssistantDispatcher::new(Arc::new(assistant), Handle::current())
    }

    #[tokio::test]
    async fn test_dispatch_and_wait() {
        let mut dispatcher = dispatcher(Arc::new(ScriptedGenerator::new(vec![])));
        dispatcher.dispatch("restart".to_string());
        assert_eq!(dispatcher.in_flight(), 1);

        let replies = dispatcher.wait_idle().await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].effect, Effect::ResetGame);
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_collect_ready_does_not_block() {
        let mut dispatcher = dispatcher(Arc::new(StalledGenerator));
        dispatcher.dispatch("hello".to_string());

        assert!(dispatcher.collect_ready().is_empty());
        assert_eq!(dispatcher.in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_ready_after_completion() {
        let mut dispatcher = dispatcher(Arc::new(StalledGenerator));
        dispatcher.dispatch("hello".to_string());

        // Past the one second generation timeout
        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;

        let mut replies = dispatcher.collect_ready();
        if replies.is_empty() {
            replies = dispatcher.wait_idle().await;
        }
        assert_eq!(replies.len(), 1);
        assert_eq!(
            replies[0].feedback,
            "Signal interference. Please repeat the command."
        );
    }
}
