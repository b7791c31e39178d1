//! Bind parameter collection.

use serde_json::Value;

/// How a dialect spells a positional placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `?` (ANSI, MySQL, SQLite)
    #[default]
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    Numbered,
}

impl PlaceholderStyle {
    /// Placeholder for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Numbered => format!("${}", index),
        }
    }
}

/// Append-only list of bound values for one compile.
///
/// The i-th call to [`Binder::bind`] returns the i-th placeholder, so as
/// long as fragments are emitted in the order they are rendered the
/// placeholders in the final SQL line up with `values`.
#[derive(Debug, Default)]
pub struct Binder {
    style: PlaceholderStyle,
    values: Vec<Value>,
}

impl Binder {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            values: Vec::new(),
        }
    }

    /// Add a value and return the placeholder for it.
    pub fn bind(&mut self, value: Value) -> String {
        self.values.push(value);
        self.style.placeholder(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}
