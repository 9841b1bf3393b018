use serde::{Deserialize, Serialize};

pub mod completions;

pub use completions::{ApiError, CompletionClient, HttpCompletionClient};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Deserialize)]
pub struct CompletionChoice {
    pub text: String,
}

#[derive(Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}
