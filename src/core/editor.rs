//! Interactive editing of the settings tree.
//!
//! An edit session lists a node, asks for an entry number and acts on it:
//! `0` backs out, a group opens a nested session for that group, and a
//! scalar is replaced by text coerced to the scalar's current type. Only a
//! successful coercion writes to the tree.

use std::io::{BufRead, Write};

use tracing::debug;

use super::settings::{ConfigTree, SettingValue};
use crate::utils::console::{Console, UiError};

const SETTINGS_HEADER: &str = "\nWhich setting would you like to change?";
const SUB_SETTINGS_HEADER: &str = "\nWhich sub-setting would you like to change?";
const INDEX_PROMPT: &str = "\nEnter the setting index to update (0 to go back): ";
const INVALID_INDEX_MSG: &str = "Invalid setting index. Please try again.";
const CANCEL_INDEX: &str = "0";

/// What a selection did to the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Cancelled,
    InvalidSelection,
    /// The named entry now holds a new value.
    Updated(String),
    /// The replacement text did not fit the entry's type; nothing changed.
    Rejected(String),
    /// The named group was opened; the inner outcome says what happened there.
    Nested(String, Box<EditOutcome>),
}

pub struct SettingsEditor<'c, R, W> {
    console: &'c mut Console<R, W>,
}

impl<'c, R: BufRead, W: Write> SettingsEditor<'c, R, W> {
    pub fn new(console: &'c mut Console<R, W>) -> Self {
        Self { console }
    }

    /// Run one edit session on the root of `settings`.
    pub fn run(&mut self, settings: &mut ConfigTree) -> Result<EditOutcome, UiError> {
        self.console.say(SETTINGS_HEADER)?;
        self.edit_node(settings)
    }

    fn edit_node(&mut self, node: &mut ConfigTree) -> Result<EditOutcome, UiError> {
        for line in node.display() {
            self.console.say(line)?;
        }
        let index = self.console.prompt(INDEX_PROMPT)?;
        self.select(node, &index)
    }

    /// Act on entry `index` of `node`, numbered as in [`ConfigTree::display`].
    pub fn select(&mut self, node: &mut ConfigTree, index: &str) -> Result<EditOutcome, UiError> {
        let index = index.trim();
        if index == CANCEL_INDEX {
            return Ok(EditOutcome::Cancelled);
        }

        let Some(key) = parse_index(index, node.numbered_len())
            .and_then(|number| node.numbered_key(number))
            .map(str::to_owned)
        else {
            self.console.say(INVALID_INDEX_MSG)?;
            return Ok(EditOutcome::InvalidSelection);
        };

        let Some(current) = node.get_mut(&key) else {
            return Ok(EditOutcome::InvalidSelection);
        };

        if let SettingValue::Tree(child) = current {
            self.console.say(SUB_SETTINGS_HEADER)?;
            let outcome = self.edit_node(child)?;
            return Ok(EditOutcome::Nested(key, Box::new(outcome)));
        }

        let input = self
            .console
            .prompt(&format!("Enter the new value for {key}: "))?;
        match current.coerce(&input) {
            Ok(value) => {
                debug!(setting = %key, %value, "Setting updated");
                *current = value;
                Ok(EditOutcome::Updated(key))
            }
            Err(err) => {
                self.console.say(format!("Invalid value for {key}: {err}"))?;
                Ok(EditOutcome::Rejected(key))
            }
        }
    }
}

fn parse_index(input: &str, count: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|number| (1..=count).contains(number))
}
