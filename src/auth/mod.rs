//! API credential handling
//!
//! The key comes from `OPENAI_API_KEY` when set. Whenever it is missing, or
//! after the service rejects a request, the user is asked for a new one and
//! the prompt repeats until a non-empty key is entered.

use std::env;
use std::io::{BufRead, Write};

use tracing::info;

use crate::utils::console::{Console, UiError};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const MISSING_KEY_MSG: &str = "API Key not found.";
const KEY_PROMPT: &str = "Please enter your OpenAI API Key: ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    api_key: Option<String>,
}

impl Credential {
    /// Blank keys count as absent.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(env::var(API_KEY_ENV).ok())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.api_key.is_some()
    }

    /// Forget the current key; the next [`Credential::ensure`] will prompt.
    pub fn clear(&mut self) {
        if self.api_key.take().is_some() {
            info!("API key cleared");
        }
    }

    /// Return the key, prompting until one is supplied if none is held.
    pub fn ensure<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<String, UiError> {
        while self.api_key.is_none() {
            console.say(MISSING_KEY_MSG)?;
            let input = console.prompt(KEY_PROMPT)?;
            *self = Self::new(Some(input));
        }
        Ok(self.api_key.clone().unwrap_or_default())
    }
}
