//! Completion parameters read out of the settings tree.

use std::fmt;

use tracing::warn;

use super::defaults::{MAX_TOKENS_KEY, MODEL_KEY, QUERY_SETTINGS_KEY, ROLE_KEY, TEMPERATURE_KEY};
use super::models::find_model_id;
use super::{ConfigTree, SettingValue};
use crate::api::CompletionRequest;

/// The settings tree no longer holds what a completion request needs.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsError {
    Missing {
        path: String,
    },
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    OutOfRange {
        path: String,
        value: i64,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Missing { path } => write!(f, "setting '{path}' is missing"),
            SettingsError::WrongType {
                path,
                expected,
                found,
            } => write!(f, "setting '{path}' should be {expected}, found {found}"),
            SettingsError::OutOfRange { path, value } => {
                write!(f, "setting '{path}' is out of range: {value}")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    /// Display name as stored in the `Model` setting.
    pub model_name: String,
    /// Identifier sent to the API.
    pub model_id: String,
    pub role: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl QueryParameters {
    pub fn from_settings(settings: &ConfigTree) -> Result<Self, SettingsError> {
        let model_name = text(settings, &[MODEL_KEY])?;
        let model_id = find_model_id(&model_name).unwrap_or_else(|| {
            warn!(model = %model_name, "Model not in catalog; sending name as model id");
            model_name.clone()
        });

        let max_tokens_path = [QUERY_SETTINGS_KEY, MAX_TOKENS_KEY];
        let max_tokens = integer(settings, &max_tokens_path)?;
        let max_tokens = u32::try_from(max_tokens).map_err(|_| SettingsError::OutOfRange {
            path: max_tokens_path.join("/"),
            value: max_tokens,
        })?;

        let temperature = float(settings, &[QUERY_SETTINGS_KEY, TEMPERATURE_KEY])?;

        Ok(Self {
            model_name,
            model_id,
            role: text(settings, &[QUERY_SETTINGS_KEY, ROLE_KEY])?,
            max_tokens,
            temperature,
        })
    }

    /// The prompt sent for `query`: the query prefixed with the role label.
    pub fn prompt_for(&self, query: &str) -> String {
        format!("{}: {}", self.role, query)
    }

    pub fn request_for(&self, query: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model_id.clone(),
            prompt: self.prompt_for(query),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

fn setting<'a>(settings: &'a ConfigTree, path: &[&str]) -> Result<&'a SettingValue, SettingsError> {
    settings.lookup(path).ok_or_else(|| SettingsError::Missing {
        path: path.join("/"),
    })
}

fn text(settings: &ConfigTree, path: &[&str]) -> Result<String, SettingsError> {
    let value = setting(settings, path)?;
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(path, "text", value))
}

fn integer(settings: &ConfigTree, path: &[&str]) -> Result<i64, SettingsError> {
    let value = setting(settings, path)?;
    value
        .as_integer()
        .ok_or_else(|| wrong_type(path, "integer", value))
}

fn float(settings: &ConfigTree, path: &[&str]) -> Result<f64, SettingsError> {
    let value = setting(settings, path)?;
    value
        .as_float()
        .ok_or_else(|| wrong_type(path, "float", value))
}

fn wrong_type(path: &[&str], expected: &'static str, found: &SettingValue) -> SettingsError {
    SettingsError::WrongType {
        path: path.join("/"),
        expected,
        found: found.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::default_settings;

    #[test]
    fn defaults_resolve_to_catalog_model() {
        let params = QueryParameters::from_settings(&default_settings()).unwrap();
        assert_eq!(
            params,
            QueryParameters {
                model_name: "GPT-3".to_string(),
                model_id: "text-davinci-002".to_string(),
                role: "user".to_string(),
                max_tokens: 60,
                temperature: 0.5,
            }
        );
    }

    #[test]
    fn request_prefixes_prompt_with_role() {
        let params = QueryParameters::from_settings(&default_settings()).unwrap();
        let request = params.request_for("hello");
        assert_eq!(request.prompt, "user: hello");
        assert_eq!(request.model, "text-davinci-002");
        assert_eq!(request.max_tokens, 60);
        assert_eq!(request.temperature, 0.5);
    }

    #[test]
    fn unknown_model_is_sent_verbatim() {
        let mut settings = default_settings();
        settings.insert(MODEL_KEY, "my-finetune");
        let params = QueryParameters::from_settings(&settings).unwrap();
        assert_eq!(params.model_id, "my-finetune");
    }

    #[test]
    fn negative_max_tokens_is_out_of_range() {
        let mut settings = default_settings();
        let mut query = settings.subtree(QUERY_SETTINGS_KEY).unwrap().clone();
        query.insert(MAX_TOKENS_KEY, -5_i64);
        settings.insert(QUERY_SETTINGS_KEY, query);

        assert_eq!(
            QueryParameters::from_settings(&settings),
            Err(SettingsError::OutOfRange {
                path: "Query Settings/Max Tokens".to_string(),
                value: -5,
            })
        );
    }

    #[test]
    fn missing_group_is_reported() {
        let settings = ConfigTree::new().with(MODEL_KEY, "GPT-3");
        assert_eq!(
            QueryParameters::from_settings(&settings),
            Err(SettingsError::Missing {
                path: "Query Settings/Max Tokens".to_string(),
            })
        );
    }

    #[test]
    fn wrong_type_is_reported() {
        let settings = default_settings().with(MODEL_KEY, 3_i64);
        assert_eq!(
            QueryParameters::from_settings(&settings),
            Err(SettingsError::WrongType {
                path: "Model".to_string(),
                expected: "text",
                found: "integer",
            })
        );
    }

    #[test]
    fn text_temperature_is_wrong_type() {
        let mut settings = default_settings();
        let mut query = settings.subtree(QUERY_SETTINGS_KEY).unwrap().clone();
        query.insert(TEMPERATURE_KEY, "warm");
        settings.insert(QUERY_SETTINGS_KEY, query);

        assert_eq!(
            QueryParameters::from_settings(&settings),
            Err(SettingsError::WrongType {
                path: "Query Settings/Temperature".to_string(),
                expected: "float",
                found: "text",
            })
        );
    }
}
