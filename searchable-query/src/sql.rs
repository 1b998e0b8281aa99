//! SQL generation utilities.

use serde::{Deserialize, Serialize};

use crate::filter::FilterValue;

/// Escape a string for use in SQL (for identifiers, not values).
pub fn escape_identifier(name: &str) -> String {
    let escaped = name.replace('"', "\"\"");
    format!("\"{}\"", escaped)
}

/// Check if an identifier needs quoting.
pub fn needs_quoting(name: &str) -> bool {
    let reserved = [
        "user", "order", "group", "select", "from", "where", "table", "index",
        "key", "primary", "foreign", "check", "default", "null", "not", "and",
        "or", "in", "is", "like", "ilike", "escape", "between", "case", "when",
        "then", "else", "end", "as", "on", "join", "limit", "offset", "union",
        "all", "distinct", "having", "values", "set", "returning",
    ];

    if reserved.contains(&name.to_lowercase().as_str()) {
        return true;
    }

    !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote an identifier if needed.
///
/// Dotted names (`users.email`) are quoted segment by segment.
pub fn quote_identifier(name: &str) -> String {
    if name.contains('.') {
        return name
            .split('.')
            .map(quote_segment)
            .collect::<Vec<_>>()
            .join(".");
    }
    quote_segment(name)
}

fn quote_segment(name: &str) -> String {
    if needs_quoting(name) {
        escape_identifier(name)
    } else {
        name.to_string()
    }
}

/// SQL dialect used when rendering conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// PostgreSQL uses $1, $2, etc.
    #[default]
    #[serde(alias = "postgres")]
    PostgreSQL,
    /// MySQL uses ?, ?, etc.
    MySQL,
    /// SQLite uses ?, ?, etc.
    #[serde(alias = "sqlite3")]
    SQLite,
}

impl DatabaseType {
    /// Get the parameter placeholder for this database type.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${}", index),
            Self::MySQL | Self::SQLite => "?".to_string(),
        }
    }

    /// Whether the dialect has a native `ILIKE`.
    pub fn supports_ilike(&self) -> bool {
        matches!(self, Self::PostgreSQL)
    }

    /// Render an `ESCAPE '<c>'` clause as a string literal for this dialect.
    pub fn escape_clause(&self, escape: char) -> String {
        match (self, escape) {
            (_, '\'') => "ESCAPE ''''".to_string(),
            // MySQL treats backslash as an escape inside string literals.
            (Self::MySQL, '\\') => "ESCAPE '\\\\'".to_string(),
            (_, c) => format!("ESCAPE '{}'", c),
        }
    }

    /// Get the dialect name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "postgresql",
            Self::MySQL => "mysql",
            Self::SQLite => "sqlite",
        }
    }
}

/// A SQL builder for constructing queries.
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    db_type: DatabaseType,
    parts: Vec<String>,
    params: Vec<FilterValue>,
}

impl SqlBuilder {
    /// Create a new SQL builder.
    pub fn new(db_type: DatabaseType) -> Self {
        Self {
            db_type,
            parts: Vec::new(),
            params: Vec::new(),
        }
    }

    /// The dialect being rendered.
    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    /// Push a literal SQL string.
    pub fn push(&mut self, sql: impl AsRef<str>) -> &mut Self {
        self.parts.push(sql.as_ref().to_string());
        self
    }

    /// Push a parameter placeholder and record its value.
    pub fn push_param(&mut self, value: impl Into<FilterValue>) -> &mut Self {
        let index = self.params.len() + 1;
        self.parts.push(self.db_type.placeholder(index));
        self.params.push(value.into());
        self
    }

    /// Push an identifier (properly quoted if needed).
    pub fn push_identifier(&mut self, name: &str) -> &mut Self {
        self.parts.push(quote_identifier(name));
        self
    }

    /// Build the final SQL string and parameters.
    pub fn build(self) -> (String, Vec<FilterValue>) {
        (self.parts.join(""), self.params)
    }
}
