//! Numbered rendering of a settings tree.

use std::slice;

use super::{ConfigTree, SettingValue, RESERVED_KEY};

/// Spaces added per nesting level.
pub const INDENT_WIDTH: usize = 4;

struct Frame<'a> {
    entries: slice::Iter<'a, (String, SettingValue)>,
    counter: usize,
    depth: usize,
}

impl<'a> Frame<'a> {
    fn new(node: &'a ConfigTree, depth: usize) -> Self {
        Self {
            entries: node.entries().iter(),
            counter: 0,
            depth,
        }
    }
}

/// Lazily yields one line per setting.
///
/// Numbers start at 1 in every node and restart inside each group, so a
/// number only identifies an entry among its siblings. A group line ends
/// with a colon and is followed by its children one indent level deeper.
/// The reserved menu key is skipped.
pub struct SettingsDisplay<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> SettingsDisplay<'a> {
    pub fn new(node: &'a ConfigTree, indent: usize) -> Self {
        Self {
            stack: vec![Frame::new(node, indent)],
        }
    }
}

impl<'a> Iterator for SettingsDisplay<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some((key, value)) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };
            if key == RESERVED_KEY {
                continue;
            }

            frame.counter += 1;
            let number = frame.counter;
            let depth = frame.depth;
            let pad = " ".repeat(INDENT_WIDTH * depth);

            return Some(match value {
                SettingValue::Tree(child) => {
                    self.stack.push(Frame::new(child, depth + 1));
                    format!("{number}. {pad}{key}:")
                }
                scalar => format!("{number}. {pad}{key}: {scalar}"),
            });
        }
    }
}
