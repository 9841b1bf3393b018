use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ApiError, CompletionClient, CompletionRequest};
use crate::utils::console::Console;

pub type ScriptedConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

/// Console that answers prompts with `lines`, in order, then reports EOF.
pub fn scripted_console(lines: &[&str]) -> ScriptedConsole {
    let mut input = String::new();
    for line in lines {
        input.push_str(line);
        input.push('\n');
    }
    Console::new(Cursor::new(input.into_bytes()), Vec::new())
}

/// Completion client that replays canned replies and records each request.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, ApiError>>>,
    requests: Mutex<Vec<(CompletionRequest, String)>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, ApiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// Requests received so far, paired with the API key they carried.
    pub fn requests(&self) -> Vec<(CompletionRequest, String)> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn rejected(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> Result<String, ApiError> {
        self.requests
            .lock()
            .unwrap()
            .push((request.clone(), api_key.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ApiError::EmptyResponse))
    }
}
