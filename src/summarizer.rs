//! AI summarization of free-text input into category fields.
//!
//! The summarizer is asked for a JSON object keyed by field id. Models often
//! wrap the object in a fenced code block, which is stripped before parsing.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::category::{Category, CategoryRegistry};
use crate::engine::{field_values_from_json, FieldValues};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Errors that can occur while summarizing.
#[derive(Debug)]
pub enum SummarizeError {
    /// Request could not be sent or the body could not be read.
    HttpError(String),
    /// The API answered with a non-success status.
    ApiError(u16, String),
    /// The API answered without any text.
    EmptyResponse,
    /// The text is not a JSON object of fields. Carries the raw payload.
    InvalidPayload { message: String, payload: String },
}

impl std::fmt::Display for SummarizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizeError::HttpError(e) => write!(f, "HTTP error: {}", e),
            SummarizeError::ApiError(status, body) => {
                write!(f, "API request failed with status {}: {}", status, body)
            }
            SummarizeError::EmptyResponse => write!(f, "No content in response"),
            SummarizeError::InvalidPayload { message, .. } => {
                write!(f, "Invalid field mapping: {}", message)
            }
        }
    }
}

impl std::error::Error for SummarizeError {}

/// A text-generation backend.
pub trait Summarizer: Send + Sync {
    /// Sends `prompt` and returns the generated text.
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, SummarizeError>>;
}

/// Builds the prompt asking for a category's fields as JSON.
pub fn build_prompt(registry: &CategoryRegistry, category: &Category, content: &str) -> String {
    let mut prompt = String::new();
    if !category.prompt.is_empty() {
        prompt.push_str(&category.prompt);
        prompt.push_str("\n\n");
    }
    prompt.push_str("Respond with a JSON object with the following fields:\n");
    for field in &category.fields {
        prompt.push_str(&format!("- \"{}\": {}\n", field, registry.field_title(field)));
    }
    prompt.push_str("Use a string for single values and a list of strings for lists.\n\n");
    prompt.push_str(&format!("{}:\n\"{}\"\n", category.title, content));
    prompt
}

/// Removes a surrounding fenced code block such as ```` ```json ... ``` ````.
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // Drop the info string (e.g. `json`) on the opening fence line.
        s = match rest.find('\n') {
            Some(newline) if !rest[..newline].contains('{') => &rest[newline + 1..],
            _ => rest.trim_start_matches("json"),
        };
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Parses summarizer output into field values.
pub fn parse_field_mapping(payload: &str) -> Result<FieldValues, SummarizeError> {
    let cleaned = strip_code_fence(payload);
    let value: serde_json::Value =
        serde_json::from_str(cleaned).map_err(|e| SummarizeError::InvalidPayload {
            message: e.to_string(),
            payload: payload.to_string(),
        })?;

    match value.as_object() {
        Some(map) => Ok(field_values_from_json(map)),
        None => Err(SummarizeError::InvalidPayload {
            message: "expected a JSON object".to_string(),
            payload: payload.to_string(),
        }),
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Summarizer backed by the Gemini `generateContent` API.
pub struct GeminiSummarizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiSummarizer {
    pub fn new(api_key: String, model: String) -> Result<Self, SummarizeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SummarizeError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String, SummarizeError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizeError::HttpError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SummarizeError::ApiError(status.as_u16(), text));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::HttpError(e.without_url().to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|text| !text.is_empty())
            .ok_or(SummarizeError::EmptyResponse)
    }
}

impl Summarizer for GeminiSummarizer {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, SummarizeError>> {
        Box::pin(self.generate(prompt))
    }
}
