//! The clickable column list shown after a successful header preview.

use serde::Serialize;

pub const MENU_TITLE: &str = "Available Columns";
pub const MENU_PROMPT: &str = "Click a column name to add it to Sensitive Columns:";
const MENU_WIDTH: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuOptions {
    pub show_confirm_button: bool,
    pub width: u32,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            show_confirm_button: false,
            width: MENU_WIDTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMenuEntry {
    index: usize,
    name: String,
}

impl ColumnMenuEntry {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The column name exactly as the server reported it.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMenu {
    pub title: String,
    pub prompt: String,
    pub options: MenuOptions,
    entries: Vec<ColumnMenuEntry>,
}

impl ColumnMenu {
    pub fn from_columns(columns: Vec<String>) -> Self {
        let entries = columns
            .into_iter()
            .enumerate()
            .map(|(index, name)| ColumnMenuEntry { index, name })
            .collect();
        Self {
            title: MENU_TITLE.to_string(),
            prompt: MENU_PROMPT.to_string(),
            options: MenuOptions::default(),
            entries,
        }
    }

    pub fn entries(&self) -> &[ColumnMenuEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&ColumnMenuEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
