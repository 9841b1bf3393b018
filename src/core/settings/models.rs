//! Built-in model catalog
//!
//! The `Model` setting holds a display name; requests are sent with the API
//! identifier listed for it in builtin_models.toml.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BuiltinModel {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct BuiltinModelsConfig {
    models: Vec<BuiltinModel>,
}

/// Load the models embedded at build time.
pub fn load_builtin_models() -> Vec<BuiltinModel> {
    const CONFIG_CONTENT: &str = include_str!("../../builtin_models.toml");

    let config: BuiltinModelsConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml");

    config.models
}

/// API identifier for a display name, if the name is in the catalog.
pub fn find_model_id(name: &str) -> Option<String> {
    load_builtin_models()
        .into_iter()
        .find(|model| model.name == name)
        .map(|model| model.id)
}
