use super::{ConfigTree, RESERVED_KEY};

pub const MODEL_KEY: &str = "Model";
pub const QUERY_SETTINGS_KEY: &str = "Query Settings";
pub const MAX_TOKENS_KEY: &str = "Max Tokens";
pub const TEMPERATURE_KEY: &str = "Temperature";
pub const ROLE_KEY: &str = "Role";
pub const MENU_KEY: &str = RESERVED_KEY;

/// Settings every session starts from.
pub fn default_settings() -> ConfigTree {
    ConfigTree::new()
        .with(MODEL_KEY, "GPT-3")
        .with(
            QUERY_SETTINGS_KEY,
            ConfigTree::new()
                .with(MAX_TOKENS_KEY, 60_i64)
                .with(TEMPERATURE_KEY, 0.5_f64)
                .with(ROLE_KEY, "user"),
        )
        .with(
            MENU_KEY,
            ConfigTree::new()
                .with("1", "Chat")
                .with("2", "Copilot")
                .with("3", "Export data")
                .with("s", "Settings")
                .with("?", "Help")
                .with("x", "Exit"),
        )
}
