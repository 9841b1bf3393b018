//! Chat history and its JSON export.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use super::chat::ChatMode;

const EXPORT_PREFIX: &str = "gpt_chat_export_";
const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One completed query/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub query: String,
    pub response: String,
    /// The response again in copilot mode, empty otherwise.
    pub copilot_response: String,
}

impl InteractionRecord {
    pub fn new(query: impl Into<String>, response: impl Into<String>, mode: ChatMode) -> Self {
        let response = response.into();
        let copilot_response = match mode {
            ChatMode::Copilot => response.clone(),
            ChatMode::Standard => String::new(),
        };
        Self {
            query: query.into(),
            response,
            copilot_response,
        }
    }
}

#[derive(Debug)]
pub enum ExportError {
    Serialize(serde_json::Error),
    Write { path: PathBuf, source: io::Error },
    AlreadyExists { path: PathBuf },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Serialize(err) => write!(f, "Failed to serialize chat history: {err}"),
            ExportError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            ExportError::AlreadyExists { path } => {
                write!(f, "File '{}' already exists", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Serialize(err) => Some(err),
            ExportError::Write { source, .. } => Some(source),
            ExportError::AlreadyExists { .. } => None,
        }
    }
}

/// Append-only log of the exchanges in this process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionLog {
    records: Vec<InteractionRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: InteractionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write the whole log to a new timestamped file in `dir`.
    ///
    /// The file is written to a temporary sibling and moved into place, and
    /// an existing file of the same name is never replaced.
    pub fn export(&self, dir: &Path, timestamp: NaiveDateTime) -> Result<PathBuf, ExportError> {
        let path = dir.join(export_filename(timestamp));
        let contents = self.to_json().map_err(ExportError::Serialize)?;
        let write_err = |source| ExportError::Write {
            path: path.clone(),
            source,
        };

        let mut temp_file = NamedTempFile::new_in(dir).map_err(write_err)?;
        temp_file.write_all(contents.as_bytes()).map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file.persist_noclobber(&path).map_err(|err| {
            if err.error.kind() == io::ErrorKind::AlreadyExists {
                ExportError::AlreadyExists { path: path.clone() }
            } else {
                write_err(err.error)
            }
        })?;

        info!(path = %path.display(), records = self.len(), "Exported chat history");
        Ok(path)
    }
}

pub fn export_filename(timestamp: NaiveDateTime) -> String {
    format!(
        "{EXPORT_PREFIX}{}.json",
        timestamp.format(EXPORT_TIMESTAMP_FORMAT)
    )
}
