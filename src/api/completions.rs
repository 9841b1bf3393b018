//! Text-completion requests
//!
//! A single request/response exchange against an OpenAI-compatible
//! `/completions` endpoint. The chat loop only sees the [`CompletionClient`]
//! trait, so tests can substitute a scripted client.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// A completion request that did not produce text.
#[derive(Debug)]
pub enum ApiError {
    /// The request never completed or the body could not be decoded.
    Transport(reqwest::Error),
    /// The service answered with a non-success status.
    Status { status: u16, message: String },
    /// The service answered successfully but without any choices.
    EmptyResponse,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "request failed: {err}"),
            ApiError::Status { status, message } => write!(f, "{message} (HTTP {status})"),
            ApiError::EmptyResponse => write!(f, "response contained no completion choices"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `request` authenticated with `api_key` and return the generated
    /// text of the first choice.
    async fn complete(&self, request: &CompletionRequest, api_key: &str)
        -> Result<String, ApiError>;
}

pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCompletionClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        completions_url(&self.base_url)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<String, ApiError> {
        let url = self.endpoint();
        debug!(
            %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            temperature = request.temperature,
            "Sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(status = status.as_u16(), "Completion request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: summarize_error_body(&error_text),
            });
        }

        let body: CompletionResponse = response.json().await.map_err(ApiError::Transport)?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(ApiError::EmptyResponse)
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/completions", base_url.trim_end_matches('/'))
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value
                .get("error")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// One-line description of an error body, preferring the JSON `message`.
fn summarize_error_body(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| trimmed.split_whitespace().collect::<Vec<_>>().join(" "))
}
