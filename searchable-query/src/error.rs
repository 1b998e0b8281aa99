//! Error types for condition composition with actionable messages.
//!
//! Blank or uncoercible search terms are never errors: the guard simply
//! returns the base query. Everything in this module is a caller-visible
//! usage error.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: S{category}{number}
//! - 1xxx: Composition errors (empty chain, type mismatch, operand)
//! - 2xxx: Registry errors (unknown named filter)
//! - 7xxx: Configuration errors
//!
//! ```rust
//! use searchable_query::{ErrorCode, SearchError};
//!
//! let err = SearchError::empty_chain();
//! assert_eq!(err.code, ErrorCode::EmptyChain);
//! assert_eq!(err.code.code(), "S1001");
//! ```
//!
//! # Inspecting Errors
//!
//! ```rust
//! use searchable_query::SearchError;
//!
//! let err = SearchError::type_mismatch("integer", "42");
//! assert!(err.is_type_mismatch());
//! assert!(err.to_string().contains("integer"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for composition operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Composition errors (1xxx)
    /// An OR chain was requested with nothing to combine (S1001).
    EmptyChain = 1001,
    /// A chain item could not be normalized to a condition (S1002).
    TypeMismatch = 1002,
    /// The right-hand side of a direct OR is neither a query nor a condition (S1003).
    UnsupportedOperand = 1003,

    // Registry errors (2xxx)
    /// A named filter was not registered for the model (S2001).
    UnknownFilter = 2001,

    // Configuration errors (7xxx)
    /// Invalid configuration value (S7001).
    InvalidConfiguration = 7001,
    /// Configuration file could not be read (S7002).
    ConfigIo = 7002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "S1001").
    pub fn code(&self) -> String {
        format!("S{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::EmptyChain => "Empty condition chain",
            Self::TypeMismatch => "Value cannot be normalized to a condition",
            Self::UnsupportedOperand => "Unsupported OR operand",
            Self::UnknownFilter => "Unknown named filter",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::ConfigIo => "Configuration file unreadable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The model whose registry was consulted.
    pub model: Option<String>,
    /// Type name of the offending value.
    pub operand_type: Option<String>,
    /// The named filter involved.
    pub filter: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors raised while composing search conditions.
#[derive(Error, Debug)]
pub struct SearchError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl SearchError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.context.model = Some(model.into());
        self
    }

    /// Set the offending operand type.
    pub fn with_operand_type(mut self, type_name: impl Into<String>) -> Self {
        self.context.operand_type = Some(type_name.into());
        self
    }

    /// Set the named filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.context.filter = Some(filter.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// An OR fold was requested over zero conditions.
    pub fn empty_chain() -> Self {
        Self::new(
            ErrorCode::EmptyChain,
            "Cannot build a condition chain from zero items",
        )
        .with_suggestion("Pass at least one named filter or condition to search_or_chain")
    }

    /// A value could not be normalized to a condition.
    pub fn type_mismatch(type_name: impl Into<String>, value: impl fmt::Display) -> Self {
        let type_name = type_name.into();
        Self::new(
            ErrorCode::TypeMismatch,
            format!("Cannot normalize {} value `{}` to a condition", type_name, value),
        )
        .with_operand_type(&type_name)
        .with_help("Only queries and conditions can take part in an OR chain")
    }

    /// A chain mixed filter names with prebuilt operands.
    pub fn mixed_chain(found: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::TypeMismatch,
            format!("Chain item is a {}, expected a {}", found, expected),
        )
        .with_operand_type(found)
        .with_help("A chain is either all filter names or all queries and conditions")
    }

    /// The right-hand side of `or_with` was a raw value.
    pub fn unsupported_operand(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self::new(
            ErrorCode::UnsupportedOperand,
            format!(
                "OR operand must be a query or a condition, got {}",
                type_name
            ),
        )
        .with_operand_type(&type_name)
    }

    /// No filter with this name was registered for the model.
    pub fn unknown_filter(model: impl Into<String>, filter: impl Into<String>) -> Self {
        let model = model.into();
        let filter = filter.into();
        Self::new(
            ErrorCode::UnknownFilter,
            format!("No filter named `{}` is registered for {}", filter, model),
        )
        .with_model(&model)
        .with_filter(&filter)
        .with_suggestion(format!(
            "Register it with Searchable::builder(\"{}\").named_filter(\"{}\", ...)",
            model, filter
        ))
    }

    /// Invalid configuration value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message)
    }

    /// Configuration file could not be read.
    pub fn config_io(path: impl fmt::Display, source: std::io::Error) -> Self {
        Self::new(
            ErrorCode::ConfigIo,
            format!("Failed to read configuration file: {}", path),
        )
        .with_source(source)
    }

    // ============== Error Type Checks ==============

    /// Check if this is an empty chain error.
    pub fn is_empty_chain(&self) -> bool {
        self.code == ErrorCode::EmptyChain
    }

    /// Check if this is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        self.code == ErrorCode::TypeMismatch
    }

    /// Check if this is an unsupported operand error.
    pub fn is_unsupported_operand(&self) -> bool {
        self.code == ErrorCode::UnsupportedOperand
    }

    /// Check if this is an unknown filter error.
    pub fn is_unknown_filter(&self) -> bool {
        self.code == ErrorCode::UnknownFilter
    }

    /// Check if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidConfiguration | ErrorCode::ConfigIo
        )
    }

    /// Render the error with its context for terminal output.
    pub fn display_full(&self) -> String {
        let mut output = format!("Error [{}]: {}", self.code.code(), self.message);

        if let Some(model) = &self.context.model {
            output.push_str(&format!("\n  Model: {}", model));
        }
        if let Some(filter) = &self.context.filter {
            output.push_str(&format!("\n  Filter: {}", filter));
        }
        if let Some(operand_type) = &self.context.operand_type {
            output.push_str(&format!("\n  Operand type: {}", operand_type));
        }
        for suggestion in &self.context.suggestions {
            output.push_str(&format!("\n  Suggestion: {}", suggestion));
        }
        if let Some(help) = &self.context.help {
            output.push_str(&format!("\n  Help: {}", help));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::EmptyChain.code(), "S1001");
        assert_eq!(ErrorCode::UnknownFilter.code(), "S2001");
        assert_eq!(ErrorCode::InvalidConfiguration.to_string(), "S7001");
    }

    #[test]
    fn test_type_mismatch_names_type() {
        let err = SearchError::type_mismatch("integer", 42);
        assert!(err.is_type_mismatch());
        assert_eq!(err.context.operand_type.as_deref(), Some("integer"));
        assert!(err.to_string().contains("integer"));
        assert!(err.to_string().starts_with("[S1002]"));
    }

    #[test]
    fn test_unknown_filter_context() {
        let err = SearchError::unknown_filter("User", "nickname_filter");
        assert!(err.is_unknown_filter());
        assert_eq!(err.context.model.as_deref(), Some("User"));
        assert_eq!(err.context.filter.as_deref(), Some("nickname_filter"));
        assert_eq!(err.context.suggestions.len(), 1);
    }

    #[test]
    fn test_display_full() {
        let err = SearchError::unsupported_operand("integer");
        let full = err.display_full();
        assert!(full.contains("S1003"));
        assert!(full.contains("Operand type: integer"));
    }

    #[test]
    fn test_config_io_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SearchError::config_io("searchable.toml", io);
        assert!(err.is_config_error());
        assert!(std::error::Error::source(&err).is_some());
    }
}
