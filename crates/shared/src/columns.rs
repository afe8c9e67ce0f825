//! Ordered, de-duplicated set of sensitive column names and its text form.
//!
//! The form's `sensitive_columns` field holds names joined with `", "`. The
//! set is the source of truth; the field text is only ever produced by
//! [`SensitiveColumns::serialize`] and read back through
//! [`SensitiveColumns::deserialize`].

use serde::Serialize;

pub const SENSITIVE_COLUMNS_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SensitiveColumns {
    names: Vec<String>,
}

impl SensitiveColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` unless an identical name is already present.
    ///
    /// `name` is tokenized the same way the field text is read back: split on
    /// commas, trimmed, empties dropped. Each token is then matched exactly
    /// and case-sensitively. Returns `true` when anything was inserted.
    pub fn add(&mut self, name: &str) -> bool {
        let mut inserted = false;
        for token in name.split(',').map(str::trim) {
            if token.is_empty() || self.contains(token) {
                continue;
            }
            self.names.push(token.to_string());
            inserted = true;
        }
        inserted
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn serialize(&self) -> String {
        self.names.join(SENSITIVE_COLUMNS_SEPARATOR)
    }

    /// Parses free-form field text: split on commas, trim, drop empties and
    /// repeats (first occurrence wins).
    pub fn deserialize(raw: &str) -> Self {
        let mut columns = Self::new();
        columns.add(raw);
        columns
    }
}

impl<'a> FromIterator<&'a str> for SensitiveColumns {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut columns = Self::new();
        for name in iter {
            columns.add(name);
        }
        columns
    }
}

#[cfg(test)]
#[path = "tests/columns_tests.rs"]
mod tests;
