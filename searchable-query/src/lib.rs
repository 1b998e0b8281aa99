//! # searchable-query
//!
//! Search-term guards and OR-chain condition composition.
//!
//! This crate provides:
//! - A guard that applies a filter only when the search term is valid
//! - Equality and escaped pattern search through one entry point
//! - OR chains over named filters or prebuilt queries and conditions
//! - A [`Scope`] trait so any query type can take part
//!
//! ## Conditions
//!
//! ```rust
//! use searchable_query::{Condition, DatabaseType};
//!
//! let either = Condition::equals("role", "admin").or_with(Condition::contains("email", "alice"));
//! let (sql, params) = either.to_sql(DatabaseType::PostgreSQL);
//! assert_eq!(sql, "(role = $1 OR email LIKE $2 ESCAPE '\\')");
//! assert_eq!(params.len(), 2);
//! ```
//!
//! ## Guarded Search
//!
//! Blank terms leave the query untouched:
//!
//! ```rust
//! use searchable_query::{Relation, Searchable};
//!
//! let users: Searchable<Relation> = Searchable::builder("User").build();
//! let base = Relation::new("users");
//!
//! assert_eq!(users.simple_search(base.clone(), "   ", "name"), base);
//! assert_ne!(users.simple_search(base.clone(), "bob", "name"), base);
//! ```
//!
//! ## OR Chains
//!
//! ```rust
//! use searchable_query::{ChainItem, Relation, Scope, Searchable};
//!
//! let users: Searchable<Relation> = Searchable::builder("User")
//!     .pattern_filter("name_filter", "name")
//!     .pattern_filter("email_filter", "email")
//!     .build();
//!
//! let query = users
//!     .search_or_chain(Relation::new("users"), "alice", ["name_filter", "email_filter"])
//!     .unwrap();
//! assert!(query.constraints()[0].is_disjunction());
//!
//! // A chain with nothing in it is a caller error.
//! let err = users
//!     .search_or_chain(Relation::new("users"), "alice", Vec::<ChainItem<Relation>>::new())
//!     .unwrap_err();
//! assert!(err.is_empty_chain());
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pattern;
pub mod scope;
pub mod searchable;
pub mod sql;
pub mod term;

pub use chain::{ChainItem, ChainSpec, Combinator, fold};
pub use config::{DebugSettings, SearchConfig, SearchSettings, SqlSettings};
pub use error::{ErrorCode, ErrorContext, SearchError, SearchResult};
pub use filter::{Condition, Equalities, FilterValue, Row};
pub use pattern::{LikePattern, PatternFragment, PatternOp};
pub use scope::{Operand, Relation, Scope, normalize};
pub use searchable::{FilterRule, NamedFilter, QuerySpec, Searchable, SearchableBuilder};
pub use sql::{DatabaseType, SqlBuilder};
pub use term::{IntoSearchTerm, SearchTerm};

// Used by `search_debug!` so callers need no direct `tracing` dependency.
#[doc(hidden)]
pub use tracing;

// Re-export logging utilities
pub use logging::{
    get_log_format, get_log_level, init as init_logging, init_debug, init_with_level,
    is_debug_enabled,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chain::{ChainItem, ChainSpec, Combinator};
    pub use crate::config::SearchConfig;
    pub use crate::error::{SearchError, SearchResult};
    pub use crate::filter::{Condition, Equalities, FilterValue};
    pub use crate::pattern::PatternFragment;
    pub use crate::scope::{Operand, Relation, Scope};
    pub use crate::searchable::{QuerySpec, Searchable};
    pub use crate::sql::DatabaseType;
    pub use crate::term::{IntoSearchTerm, SearchTerm};
}
