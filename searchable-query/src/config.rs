//! Configuration file parsing for `searchable.toml`.
//!
//! ```rust
//! use searchable_query::{Combinator, DatabaseType, SearchConfig};
//!
//! let config = SearchConfig::from_str(r#"
//!     [search]
//!     case_insensitive = true
//!     escape_char = "!"
//!
//!     [sql]
//!     dialect = "sqlite"
//! "#).unwrap();
//!
//! assert!(config.search.case_insensitive);
//! assert_eq!(config.search.escape_char, '!');
//! assert_eq!(config.search.combinator, Combinator::Or);
//! assert_eq!(config.sql.dialect, DatabaseType::SQLite);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chain::Combinator;
use crate::error::{SearchError, SearchResult};
use crate::pattern::DEFAULT_ESCAPE;
use crate::sql::DatabaseType;

/// Main configuration structure for `searchable.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Term handling and pattern settings.
    #[serde(default)]
    pub search: SearchSettings,

    /// SQL rendering settings.
    #[serde(default)]
    pub sql: SqlSettings,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugSettings,
}

impl SearchConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SearchResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SearchError::config_io(path.display(), e))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> SearchResult<Self> {
        let expanded = expand_env_vars(content);

        let config: Self = toml::from_str(&expanded).map_err(|e| {
            SearchError::invalid_config(format!("Invalid searchable.toml: {}", e.message()))
                .with_source(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> SearchResult<()> {
        let escape = self.search.escape_char;
        if escape == '%' || escape == '_' {
            return Err(SearchError::invalid_config(format!(
                "escape_char `{}` is a LIKE wildcard",
                escape
            ))
            .with_suggestion("Use a character such as `\\` or `!`"));
        }
        if escape.is_whitespace() {
            return Err(SearchError::invalid_config("escape_char must not be whitespace"));
        }
        // LOWER() and ILIKE fold the pattern text, so a cased escape would
        // stop matching the ESCAPE clause.
        if escape.is_alphabetic() || !escape.to_lowercase().eq([escape]) {
            return Err(SearchError::invalid_config(format!(
                "escape_char `{}` changes under case folding",
                escape
            ))
            .with_suggestion("Use a non-letter character such as `\\` or `!`"));
        }
        Ok(())
    }
}

/// Term handling and pattern settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSettings {
    /// Trim surrounding whitespace before wrapping a term in wildcards.
    #[serde(default = "default_true")]
    pub trim_term: bool,

    /// Upgrade every pattern fragment to a case-insensitive match.
    #[serde(default)]
    pub case_insensitive: bool,

    /// Escape character for LIKE patterns.
    #[serde(default = "default_escape_char")]
    pub escape_char: char,

    /// Operator used by `search_or_chain`.
    #[serde(default)]
    pub combinator: Combinator,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            trim_term: true,
            case_insensitive: false,
            escape_char: DEFAULT_ESCAPE,
            combinator: Combinator::Or,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_escape_char() -> char {
    DEFAULT_ESCAPE
}

/// SQL rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SqlSettings {
    /// Dialect used for placeholders and case-insensitive matching.
    #[serde(default)]
    pub dialect: DatabaseType,
}

/// Debug/logging settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugSettings {
    /// Log each skipped search at debug level.
    #[serde(default)]
    pub log_skips: bool,
}

/// Expand `${VAR}` references from the environment. Unset variables are left as is.
fn expand_env_vars(content: &str) -> String {
    let Ok(re) = regex_lite::Regex::new(r"\$\{([^}]+)\}") else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &regex_lite::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}
