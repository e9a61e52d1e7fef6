//! Voice assistant
//!
//! Turns finalized utterances into feedback lines and game/HUD effects.
//!
//! ```text
//! utterance → classify → Intent ─┬─ ChangeColor → generator → hex check → SetColor
//!                                ├─ ResetGame   ─────────────────────────→ ResetGame
//!                                └─ General     → generator ────────────→ reply text
//! ```
//!
//! Generation failures never escape: every path ends in a [`Reply`] with a
//! fixed fallback line.

pub mod color;
pub mod command;
pub mod dispatcher;
pub mod generator;
pub mod history;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

pub use color::AccentColor;
pub use command::{Intent, classify};
pub use dispatcher::AssistantDispatcher;
pub use generator::{AssistantError, GeminiClient, TextGenerator, UnavailableGenerator};
pub use history::{ConversationHistory, Message, Role};

/// Feedback for a color change that was applied; `{}` is the new color
const COLOR_APPLIED: &str = "Neural interface recalibrated to {}. Aesthetics updated.";
const COLOR_REJECTED: &str = "Specified spectrum outside of standard operating parameters.";
const COLOR_FAILED: &str = "Error accessing visual processor. Reverting to default cyan.";
const RESET_DONE: &str = "Game sequence re-initialized.";
const GENERAL_EMPTY: &str = "I am processing your input.";
const GENERAL_FAILED: &str = "Signal interference. Please repeat the command.";

/// State change requested by a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SetColor(AccentColor),
    ResetGame,
}

/// Outcome of one voice command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub utterance: String,
    pub intent: Intent,
    /// Line shown to the user as the assistant's answer
    pub feedback: String,
    pub effect: Effect,
}

/// Classifies utterances and asks the text generator where needed
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
    default_color: AccentColor,
}

impl Assistant {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        timeout: Duration,
        default_color: AccentColor,
    ) -> Self {
        Self {
            generator,
            timeout,
            default_color,
        }
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Produces the reply for one utterance
    pub async fn respond(&self, utterance: &str) -> Reply {
        let intent = classify(utterance);
        debug!(?intent, utterance, "Handling voice command");

        let (feedback, effect) = match intent {
            Intent::ChangeColor => self.change_color(utterance).await,
            Intent::ResetGame => (RESET_DONE.to_string(), Effect::ResetGame),
            Intent::General => (self.converse(utterance).await, Effect::None),
        };

        Reply {
            utterance: utterance.to_string(),
            intent,
            feedback,
            effect,
        }
    }

    async fn change_color(&self, utterance: &str) -> (String, Effect) {
        match self.ask(&prompts::color_prompt(utterance)).await {
            Ok(text) => {
                let text = text.trim();
                let candidate = if text.is_empty() {
                    Some(self.default_color.clone())
                } else {
                    AccentColor::parse(text)
                };

                match candidate {
                    Some(color) => (
                        COLOR_APPLIED.replace("{}", color.as_str()),
                        Effect::SetColor(color),
                    ),
                    None => {
                        debug!(response = text, "Rejected color response");
                        (COLOR_REJECTED.to_string(), Effect::None)
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, generator = self.generator.name(), "Color request failed");
                (
                    COLOR_FAILED.to_string(),
                    Effect::SetColor(self.default_color.clone()),
                )
            }
        }
    }

    async fn converse(&self, utterance: &str) -> String {
        match self.ask(&prompts::conversation_prompt(utterance)).await {
            Ok(text) if text.trim().is_empty() => GENERAL_EMPTY.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!(error = %e, generator = self.generator.name(), "Conversation request failed");
                GENERAL_FAILED.to_string()
            }
        }
    }

    async fn ask(&self, prompt: &str) -> Result<String, AssistantError> {
        tokio::time::timeout(self.timeout, self.generator.generate(prompt))
            .await
            .map_err(|_| AssistantError::Timeout)?
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use futures::FutureExt;
    use futures::future::BoxFuture;

    use super::{AssistantError, TextGenerator};

    /// Generator returning queued responses in order, then empty strings
    pub struct ScriptedGenerator {
        responses: Mutex<Vec<Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(responses: Vec<Result<&str, &str>>) -> Self {
            let mut responses: Vec<Result<String, String>> = responses
                .into_iter()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate<'a>(
            &'a self,
            prompt: &'a str,
        ) -> BoxFuture<'a, Result<String, AssistantError>> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let next = self.responses.lock().unwrap().pop();
            async move {
                match next {
                    Some(Ok(text)) => Ok(text),
                    Some(Err(reason)) => Err(AssistantError::Unavailable(reason)),
                    None => Ok(String::new()),
                }
            }
            .boxed()
        }
    }

    /// Generator that never answers
    pub struct StalledGenerator;

    impl TextGenerator for StalledGenerator {
        fn name(&self) -> &str {
            "stalled"
        }

        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> BoxFuture<'a, Result<String, AssistantError>> {
            futures::future::pending().boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{ScriptedGenerator, StalledGenerator};
    use super::*;

    fn assistant(generator: Arc<dyn TextGenerator>) -> Assistant {
        Assistant::new(generator, Duration::from_secs(5), AccentColor::default())
    }

    #[tokio::test]
    async fn test_valid_color_applied() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(" #39ff14\n")]));
        let reply = assistant(generator.clone())
            .respond("change color to green")
            .await;

        assert_eq!(reply.intent, Intent::ChangeColor);
        assert_eq!(
            reply.effect,
            Effect::SetColor(AccentColor::parse("#39ff14").unwrap())
        );
        assert_eq!(
            reply.feedback,
            "Neural interface recalibrated to #39ff14. Aesthetics updated."
        );
        assert!(generator.prompts()[0].contains("change color to green"));
    }

    #[tokio::test]
    async fn test_malformed_color_keeps_current() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok("Sure! Try #39ff14")]));
        let reply = assistant(generator).respond("new theme").await;

        assert_eq!(reply.effect, Effect::None);
        assert_eq!(reply.feedback, COLOR_REJECTED);
    }

    #[tokio::test]
    async fn test_empty_color_response_uses_default() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok("   ")]));
        let reply = assistant(generator).respond("color scheme").await;

        assert_eq!(reply.effect, Effect::SetColor(AccentColor::default()));
        assert!(reply.feedback.contains("#00f2ff"));
    }

    #[tokio::test]
    async fn test_color_failure_reverts_to_default() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Err("boom")]));
        let reply = assistant(generator).respond("color red").await;

        assert_eq!(reply.effect, Effect::SetColor(AccentColor::default()));
        assert_eq!(reply.feedback, COLOR_FAILED);
    }

    #[tokio::test]
    async fn test_reset_skips_generator() {
        let generator = Arc::new(ScriptedGenerator::new(vec![]));
        let reply = assistant(generator.clone()).respond("Restart").await;

        assert_eq!(reply.intent, Intent::ResetGame);
        assert_eq!(reply.effect, Effect::ResetGame);
        assert_eq!(reply.feedback, RESET_DONE);
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_general_reply_trimmed() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok("  All systems nominal. ")]));
        let reply = assistant(generator).respond("status report").await;

        assert_eq!(reply.intent, Intent::General);
        assert_eq!(reply.feedback, "All systems nominal.");
        assert_eq!(reply.effect, Effect::None);
    }

    #[tokio::test]
    async fn test_general_empty_and_failure_fallbacks() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Ok(""), Err("offline")]));
        let assistant = assistant(generator);

        assert_eq!(assistant.respond("hello").await.feedback, GENERAL_EMPTY);
        assert_eq!(assistant.respond("hello again").await.feedback, GENERAL_FAILED);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let assistant = Assistant::new(
            Arc::new(StalledGenerator),
            Duration::from_secs(2),
            AccentColor::default(),
        );

        assert_eq!(assistant.respond("anyone there").await.feedback, GENERAL_FAILED);
        let reply = assistant.respond("theme please").await;
        assert_eq!(reply.feedback, COLOR_FAILED);
        assert_eq!(reply.effect, Effect::SetColor(AccentColor::default()));
    }

    #[tokio::test]
    async fn test_unavailable_generator_degrades() {
        let reply = assistant(Arc::new(UnavailableGenerator::new("no API key")))
            .respond("tell me a joke")
            .await;
        assert_eq!(reply.feedback, GENERAL_FAILED);
    }
}
