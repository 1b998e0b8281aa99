//! # Searchable
//!
//! Conditional search filters and OR-combined conditions for query builders.
//!
//! Searchable provides:
//! - A guard that skips filtering for blank or invalid search terms
//! - Escaped substring search and equality filters from one entry point
//! - OR chains over registered filters or prebuilt queries
//! - Configuration through `searchable.toml`
//!
//! ## Quick Start
//!
//! ```rust
//! use searchable::prelude::*;
//!
//! let users: Searchable<Relation> = Searchable::builder("User")
//!     .pattern_filter("name_filter", "name")
//!     .pattern_filter("email_filter", "email")
//!     .build();
//!
//! let base = Relation::new("users").where_eq("active", true);
//! let query = users.search_or_chain(base.clone(), "alice", ["name_filter", "email_filter"])?;
//!
//! let (sql, _) = query.to_sql(DatabaseType::PostgreSQL);
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM users WHERE active = $1 AND (name LIKE $2 ESCAPE '\\' OR email LIKE $3 ESCAPE '\\')"
//! );
//!
//! // Nothing to search for: the base query comes back as is.
//! assert_eq!(users.search_or_chain(base.clone(), "", ["name_filter"])?, base);
//! # Ok::<(), SearchError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Condition composition, guards and configuration.
pub mod query {
    pub use searchable_query::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use searchable_query::prelude::*;
}

// Re-export key types at the crate root
pub use query::{
    Condition, Operand, Relation, Scope, SearchConfig, SearchError, SearchResult, SearchTerm,
    Searchable,
};
pub use searchable_query::search_debug;
