//! The query/response loop.
//!
//! A session alternates between reading a line and acting on it until the
//! user types the exit sentinel. Each successful completion is appended to
//! the session log; failed ones are reported and dropped.

use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::app::SessionContext;
use super::history::InteractionRecord;
use super::settings::QueryParameters;
use crate::api::CompletionClient;
use crate::utils::console::{Console, UiError};

const QUERY_PROMPT: &str = "\nEnter your query ('f' to submit by file or 'x' to exit): ";
const FILE_PATH_PROMPT: &str = "Enter the path to JSON file: ";
const INVALID_FILE_MSG: &str = "Invalid JSON query. Please try again.";
pub const FILE_SENTINEL: &str = "f";
pub const EXIT_SENTINEL: &str = "x";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Standard,
    /// Responses are also stored in the record's copilot field.
    Copilot,
}

impl ChatMode {
    fn header(self) -> &'static str {
        match self {
            ChatMode::Standard => "Chatting",
            ChatMode::Copilot => "Copilot",
        }
    }
}

/// How a line typed at the query prompt is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Query(String),
    FromFile,
    Exit,
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        if line.eq_ignore_ascii_case(FILE_SENTINEL) {
            ChatInput::FromFile
        } else if line.eq_ignore_ascii_case(EXIT_SENTINEL) {
            ChatInput::Exit
        } else {
            ChatInput::Query(line.to_string())
        }
    }
}

/// A query document that could not be used.
#[derive(Debug)]
pub enum QueryFileError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    NotAnObject { path: PathBuf },
    MissingQuery { path: PathBuf },
}

impl fmt::Display for QueryFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryFileError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            QueryFileError::Parse { path, source } => {
                write!(f, "Failed to parse {}: {}", path.display(), source)
            }
            QueryFileError::NotAnObject { path } => {
                write!(f, "{} does not contain a JSON object", path.display())
            }
            QueryFileError::MissingQuery { path } => {
                write!(f, "{} has no string \"query\" field", path.display())
            }
        }
    }
}

impl std::error::Error for QueryFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryFileError::Read { source, .. } => Some(source),
            QueryFileError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read the `query` string out of a JSON object stored at `path`.
pub fn load_query_file(path: &Path) -> Result<String, QueryFileError> {
    let contents = fs::read_to_string(path).map_err(|source| QueryFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: serde_json::Value =
        serde_json::from_str(&contents).map_err(|source| QueryFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let object = document
        .as_object()
        .ok_or_else(|| QueryFileError::NotAnObject {
            path: path.to_path_buf(),
        })?;
    object
        .get("query")
        .and_then(|query| query.as_str())
        .map(str::to_string)
        .ok_or_else(|| QueryFileError::MissingQuery {
            path: path.to_path_buf(),
        })
}

pub struct ChatSession<'a, R, W, C: ?Sized> {
    context: &'a mut SessionContext,
    console: &'a mut Console<R, W>,
    client: &'a C,
    mode: ChatMode,
}

impl<'a, R, W, C> ChatSession<'a, R, W, C>
where
    R: BufRead,
    W: Write,
    C: CompletionClient + ?Sized,
{
    pub fn new(
        context: &'a mut SessionContext,
        console: &'a mut Console<R, W>,
        client: &'a C,
        mode: ChatMode,
    ) -> Self {
        Self {
            context,
            console,
            client,
            mode,
        }
    }

    /// Loop until the user exits. Only console failures end the session early.
    pub async fn run(&mut self) -> Result<(), UiError> {
        self.context.credential.ensure(self.console)?;
        self.print_header()?;

        loop {
            let line = self.console.prompt(QUERY_PROMPT)?;
            let query = match ChatInput::parse(&line) {
                ChatInput::Exit => return Ok(()),
                ChatInput::FromFile => match self.read_query_file()? {
                    Some(query) => query,
                    None => continue,
                },
                ChatInput::Query(query) => query,
            };
            self.submit(query).await?;
        }
    }

    fn print_header(&mut self) -> Result<(), UiError> {
        match QueryParameters::from_settings(&self.context.settings) {
            Ok(params) => self.console.say(format!(
                "\n{} with {} ({})",
                self.mode.header(),
                params.model_name,
                params.model_id
            )),
            Err(err) => self
                .console
                .say(format!("\n{}; settings error: {err}", self.mode.header())),
        }
    }

    fn read_query_file(&mut self) -> Result<Option<String>, UiError> {
        let path = self.console.prompt(FILE_PATH_PROMPT)?;
        match load_query_file(Path::new(&path)) {
            Ok(query) => Ok(Some(query)),
            Err(err) => {
                warn!(error = %err, "Query file rejected");
                self.console.say(INVALID_FILE_MSG)?;
                Ok(None)
            }
        }
    }

    async fn submit(&mut self, query: String) -> Result<(), UiError> {
        let params = match QueryParameters::from_settings(&self.context.settings) {
            Ok(params) => params,
            Err(err) => {
                warn!(error = %err, "Cannot build completion request");
                return self.console.say(format!("\nSettings error: {err}"));
            }
        };
        let request = params.request_for(&query);
        let api_key = self.context.credential.ensure(self.console)?;

        match self.client.complete(&request, &api_key).await {
            Ok(text) => {
                let response = text.trim_end().to_string();
                debug!(chars = response.len(), "Completion received");
                self.context
                    .history
                    .append(InteractionRecord::new(query, response.clone(), self.mode));
                self.console.say(format!("\n{response}"))
            }
            Err(err) => {
                warn!(error = %err, "Completion request failed; resetting API key");
                self.console.say(format!("\nOpenAI API Error: {err}"))?;
                self.context.credential.clear();
                self.context.credential.ensure(self.console)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests;
