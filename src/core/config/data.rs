use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::completions::DEFAULT_BASE_URL;

/// Application configuration read from `config.toml`.
///
/// This is separate from the in-memory settings tree: it only says where to
/// talk to and where to write exports, and is never modified at runtime.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the completion API (e.g., "https://api.openai.com/v1")
    pub base_url: Option<String>,
    /// Directory that chat history exports are written to
    pub export_dir: Option<PathBuf>,
}

impl Config {
    /// Base URL to use, preferring an `OPENAI_BASE_URL` value when set.
    pub fn resolve_base_url(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Export directory, defaulting to the current directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
