//! Text-generation backends
//!
//! The assistant only needs "prompt in, text out". [`GeminiClient`] talks to
//! Google's generative language REST API; [`UnavailableGenerator`] stands in
//! when no API key is configured so voice commands still get a reply.

use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::AssistantConfig;

/// Errors from a text-generation request
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation request timed out")]
    Timeout,

    #[error("no text generator available: {0}")]
    Unavailable(String),
}

/// Asynchronous prompt-to-text service
pub trait TextGenerator: Send + Sync {
    /// Name for logs and health reports
    fn name(&self) -> &str;

    /// Generates a reply; an empty string means the service had nothing to say
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AssistantError>>;

    /// Whether requests can succeed at all
    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Client for the `generateContent` endpoint
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Builds a client with the configured endpoint, model and request timeout
    pub fn new(config: &AssistantConfig, api_key: String) -> Result<Self, AssistantError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl TextGenerator for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AssistantError>> {
        async move {
            let body = GenerateRequest {
                contents: vec![RequestContent {
                    parts: vec![RequestPart { text: prompt }],
                }],
            };

            debug!(model = %self.model, "Sending generation request");
            let response = self
                .http
                .post(self.url())
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AssistantError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: GenerateResponse = response.json().await?;
            Ok(parsed.into_text())
        }
        .boxed()
    }
}

/// Generator used when the service cannot be reached or is not configured
pub struct UnavailableGenerator {
    reason: String,
}

impl UnavailableGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextGenerator for UnavailableGenerator {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn generate<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, AssistantError>> {
        let reason = self.reason.clone();
        async move { Err(AssistantError::Unavailable(reason)) }.boxed()
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).expect("valid test JSON")
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response = parse(
            r##"{"candidates":[{"content":{"parts":[{"text":"#39"},{"text":"ff14"}]}}]}"##,
        );
        assert_eq!(response.into_text(), "#39ff14");
    }

    #[test]
    fn test_missing_candidates_is_empty_text() {
        assert_eq!(parse("{}").into_text(), "");
        assert_eq!(
            parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).into_text(),
            ""
        );
    }

    #[test]
    fn test_client_url() {
        let config = AssistantConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "m1".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, "k".to_string()).unwrap();
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/m1:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unavailable_generator_errors() {
        let generator = UnavailableGenerator::new("no key");
        assert!(!generator.is_available());
        let err = generator.generate("hi").await.unwrap_err();
        assert!(matches!(err, AssistantError::Unavailable(reason) if reason == "no key"));
    }
}
