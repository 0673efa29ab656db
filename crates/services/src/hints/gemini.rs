use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{HintProvider, HintRequest};
use crate::error::HintError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct HintConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl HintConfig {
    /// Reads `GEMINI_API_KEY`, `QUIZ_HINT_MODEL` and `QUIZ_HINT_BASE_URL`.
    ///
    /// Returns `None` when no API key is set, which disables the live provider.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GEMINI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("QUIZ_HINT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("QUIZ_HINT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Live hint provider backed by Gemini's `generateContent` API.
#[derive(Clone)]
pub struct GeminiHintProvider {
    client: Client,
    config: Option<HintConfig>,
}

impl GeminiHintProvider {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(HintConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<HintConfig>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl HintProvider for GeminiHintProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn hint(&self, request: &HintRequest<'_>) -> Result<String, HintError> {
        let config = self.config.as_ref().ok_or(HintError::Disabled)?;

        let url = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let payload = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: build_prompt(request),
                }],
            }],
        };

        debug!(model = %config.model, "requesting hint");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, model = %config.model, "hint request rejected");
            return Err(HintError::HttpStatus(status));
        }

        let body: GenerateResponse = response.json().await?;
        let text = extract_text(body).ok_or(HintError::EmptyResponse)?;

        Ok(format!("🤖 AI Assistant: {text}"))
    }
}

fn build_prompt(request: &HintRequest<'_>) -> String {
    let [a, b, c, d] = request.options;
    format!(
        "You are an AI assistant helping a player in a millionaire quiz game.
You have access to verified factual information about the topic and use it as a hint for the player.

VERIFIED FACTS:
{explanation}

QUESTION:
{question}

OPTIONS:
A) {a}
B) {b}
C) {c}
D) {d}

Your task: Provide a helpful hint based ONLY on the verified facts provided above.
- DO NOT mention the VERIFIED FACTS in response
- DO NOT contradict the verified facts
- Keep your response concise (3-4 sentences)
- Help them reason through it, then lean toward the answer at the end with phrases like \"I think\" or \"my guess is\"

Hint:",
        explanation = request.explanation,
        question = request.question,
    )
}

fn extract_text(body: GenerateResponse) -> Option<String> {
    let text: String = body
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> [String; 4] {
        ["Paris", "Rome", "Berlin", "Madrid"].map(String::from)
    }

    #[test]
    fn prompt_lists_options_by_letter() {
        let options = options();
        let prompt = build_prompt(&HintRequest {
            question: "What is the capital of France?",
            options: &options,
            explanation: "Paris is the capital of France.",
        });
        assert!(prompt.contains("A) Paris"));
        assert!(prompt.contains("D) Madrid"));
        assert!(prompt.contains("VERIFIED FACTS:\nParis is the capital of France."));
    }

    #[test]
    fn extracts_first_candidate_text() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"  I think it's Paris. "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).as_deref(), Some("I think it's Paris."));
    }

    #[test]
    fn blank_or_missing_candidates_are_empty() {
        let body: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(extract_text(body).is_none());

        let body: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#)
                .unwrap();
        assert!(extract_text(body).is_none());
    }

    #[tokio::test]
    async fn unconfigured_provider_is_disabled() {
        let provider = GeminiHintProvider::new(None);
        assert!(!provider.enabled());
        let options = options();
        let err = provider
            .hint(&HintRequest {
                question: "Q?",
                options: &options,
                explanation: "E.",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, HintError::Disabled));
    }
}
