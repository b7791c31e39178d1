//! Identifier and literal quoting.

/// Dialect-specific quoting rules. Stateless once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quoter {
    open: char,
    close: char,
    escape_backslash: bool,
}

impl Quoter {
    /// Standard SQL: `"name"`.
    pub const fn ansi() -> Self {
        Self {
            open: '"',
            close: '"',
            escape_backslash: false,
        }
    }

    /// MySQL: `` `name` `` and backslash-escaping string literals.
    pub const fn backtick() -> Self {
        Self {
            open: '`',
            close: '`',
            escape_backslash: true,
        }
    }

    pub const fn new(open: char, close: char) -> Self {
        Self {
            open,
            close,
            escape_backslash: false,
        }
    }

    /// Quote an identifier (table or column name).
    ///
    /// Dotted names are quoted segment by segment and the wildcard `*`
    /// is never quoted, so `people.*` becomes `"people".*`.
    pub fn quote_identifier(&self, name: &str) -> String {
        if name.contains('.') {
            return name
                .split('.')
                .map(|part| self.quote_segment(part))
                .collect::<Vec<_>>()
                .join(".");
        }
        self.quote_segment(name)
    }

    /// Quote a single name without splitting on dots (aliases).
    pub fn quote_segment(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        let mut doubled = String::with_capacity(self.close.len_utf8() * 2);
        doubled.push(self.close);
        doubled.push(self.close);
        format!(
            "{}{}{}",
            self.open,
            name.replace(self.close, &doubled),
            self.close
        )
    }

    /// Quote a string literal for inlining (DDL defaults and comments).
    pub fn quote_literal(&self, value: &str) -> String {
        let mut escaped = value.replace('\'', "''");
        if self.escape_backslash {
            escaped = escaped.replace('\\', "\\\\");
        }
        format!("'{}'", escaped)
    }
}

impl Default for Quoter {
    fn default() -> Self {
        Self::ansi()
    }
}
