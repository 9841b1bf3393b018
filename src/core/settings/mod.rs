//! The editable settings tree.
//!
//! Settings form an ordered tree: each node maps names to either a scalar
//! leaf or another node. Order is insertion order and never changes, so the
//! numbers shown by [`ConfigTree::display`] stay valid for the selection that
//! follows. Leaves carry their type from construction; edits coerce the
//! replacement text to that type instead of inspecting values at runtime.

pub mod defaults;
pub mod display;
pub mod models;
pub mod query;

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

pub use defaults::default_settings;
pub use display::SettingsDisplay;
pub use query::{QueryParameters, SettingsError};

/// Key of the menu definition. It lives in the tree but is never numbered
/// or offered for editing.
pub const RESERVED_KEY: &str = "Menu";

#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Tree(ConfigTree),
}

impl SettingValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            SettingValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Human-readable name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SettingValue::Text(_) => "text",
            SettingValue::Integer(_) => "integer",
            SettingValue::Float(_) => "float",
            SettingValue::Tree(_) => "group",
        }
    }

    /// Parse `input` into a value of the same variant as `self`.
    ///
    /// Text leaves accept anything verbatim. Numeric leaves require the input
    /// to parse as their number type. Groups cannot be replaced by text.
    pub fn coerce(&self, input: &str) -> Result<SettingValue, CoercionError> {
        match self {
            SettingValue::Text(_) => Ok(SettingValue::Text(input.to_string())),
            SettingValue::Integer(_) => input
                .trim()
                .parse::<i64>()
                .map(SettingValue::Integer)
                .map_err(|source| CoercionError::Integer {
                    input: input.to_string(),
                    source,
                }),
            SettingValue::Float(_) => input
                .trim()
                .parse::<f64>()
                .map(SettingValue::Float)
                .map_err(|source| CoercionError::Float {
                    input: input.to_string(),
                    source,
                }),
            SettingValue::Tree(_) => Err(CoercionError::Group),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Text(text) => f.write_str(text),
            SettingValue::Integer(value) => write!(f, "{value}"),
            // Debug keeps the decimal point on whole floats ("1.0", not "1").
            SettingValue::Float(value) => write!(f, "{value:?}"),
            SettingValue::Tree(tree) => write!(f, "({} settings)", tree.len()),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<ConfigTree> for SettingValue {
    fn from(value: ConfigTree) -> Self {
        SettingValue::Tree(value)
    }
}

/// Replacement text that does not fit the type of the setting it targets.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionError {
    Integer { input: String, source: ParseIntError },
    Float { input: String, source: ParseFloatError },
    Group,
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionError::Integer { input, source } => {
                write!(f, "'{input}' is not a whole number ({source})")
            }
            CoercionError::Float { input, source } => {
                write!(f, "'{input}' is not a number ({source})")
            }
            CoercionError::Group => write!(f, "a settings group cannot be replaced by a value"),
        }
    }
}

impl std::error::Error for CoercionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoercionError::Integer { source, .. } => Some(source),
            CoercionError::Float { source, .. } => Some(source),
            CoercionError::Group => None,
        }
    }
}

/// An ordered node of named settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    entries: Vec<(String, SettingValue)>,
}

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ConfigTree::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set `key` to `value`.
    ///
    /// A new key is appended; an existing key is overwritten where it stands
    /// and its previous value returned.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SettingValue>,
    ) -> Option<SettingValue> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SettingValue> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Follow `path` through nested groups.
    pub fn lookup(&self, path: &[&str]) -> Option<&SettingValue> {
        let (last, parents) = path.split_last()?;
        let mut node = self;
        for key in parents {
            node = node.get(key)?.as_tree()?;
        }
        node.get(last)
    }

    pub fn subtree(&self, key: &str) -> Option<&ConfigTree> {
        self.get(key).and_then(SettingValue::as_tree)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order, the reserved key included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Entries offered to the user, numbered from 1.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str, &SettingValue)> {
        self.iter()
            .filter(|(key, _)| *key != RESERVED_KEY)
            .enumerate()
            .map(|(index, (key, value))| (index + 1, key, value))
    }

    pub fn numbered_len(&self) -> usize {
        self.numbered().count()
    }

    /// Key shown as number `index` (1-based) by [`ConfigTree::display`].
    pub fn numbered_key(&self, index: usize) -> Option<&str> {
        self.numbered()
            .find(|(number, _, _)| *number == index)
            .map(|(_, key, _)| key)
    }

    /// Numbered listing of this node and its groups.
    pub fn display(&self) -> SettingsDisplay<'_> {
        SettingsDisplay::new(self, 0)
    }

    pub(crate) fn entries(&self) -> &[(String, SettingValue)] {
        &self.entries
    }
}
