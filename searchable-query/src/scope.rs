//! Query scopes and operand normalization.
//!
//! The composition layer never reaches into a concrete query builder. It
//! talks to the [`Scope`] trait, which any query type can implement, and
//! ships [`Relation`] as a ready-made implementation.
//!
//! ```rust
//! use searchable_query::{Condition, DatabaseType, Operand, Relation, Scope};
//!
//! let active = Relation::new("users").filter(Condition::equals("active", true));
//! let admins = Relation::new("users").filter(Condition::equals("role", "admin"));
//!
//! let either = active.or_with(Operand::Query(admins)).unwrap();
//! let (sql, _) = either.to_sql(DatabaseType::PostgreSQL);
//! assert_eq!(sql, "(active = $1 OR role = $2)");
//! ```

use std::fmt;

use smol_str::SmolStr;

use crate::error::{SearchError, SearchResult};
use crate::filter::{Condition, Equalities, FilterValue, Row};
use crate::pattern;
use crate::sql::{DatabaseType, SqlBuilder};

/// The query interface the composition layer depends on.
pub trait Scope: Clone + fmt::Debug {
    /// Constraints currently stored on the query, in attach order.
    fn constraints(&self) -> &[Condition];

    /// Return a new query with `condition` ANDed onto the existing constraints.
    fn filter(self, condition: Condition) -> Self;

    /// Return a fresh query over the same source with no constraints.
    fn unscoped(&self) -> Self;

    /// Apply a structured equality filter, one constraint per pair.
    fn filter_eq(self, equalities: Equalities) -> Self {
        equalities
            .into_iter()
            .fold(self, |scope, (column, value)| {
                scope.filter(Condition::Equals(column, value))
            })
    }

    /// Escape a raw term for literal embedding in a LIKE pattern.
    fn escape_pattern(&self, term: &str, escape: char) -> String {
        pattern::escape_like(term, escape)
    }

    /// The stored constraints as a single condition node.
    ///
    /// A query with one constraint yields that constraint; several yield
    /// their conjunction; none yields [`Condition::None`].
    fn primary_condition(&self) -> Condition {
        Condition::and(self.constraints().iter().cloned())
    }

    /// OR this query's condition with another query or condition.
    ///
    /// Raw values are rejected with an unsupported-operand error.
    fn or_with(&self, right: Operand<Self>) -> SearchResult<Condition> {
        self.primary_condition().or_operand(right)
    }
}

/// Anything that can be offered to normalization or a direct OR.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand<Q> {
    /// A query whose stored constraints become the condition.
    Query(Q),
    /// An already-built condition, used as is.
    Condition(Condition),
    /// A plain value. Only a blank value is acceptable, and only to normalization.
    Value(FilterValue),
}

impl<Q> Operand<Q> {
    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Query(_) => "query",
            Self::Condition(_) => "condition",
            Self::Value(value) => value.type_name(),
        }
    }

    /// A value with nothing in it.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Value(value) if value.is_blank())
    }
}

impl<Q> From<Condition> for Operand<Q> {
    fn from(condition: Condition) -> Self {
        Self::Condition(condition)
    }
}

impl<Q> From<FilterValue> for Operand<Q> {
    fn from(value: FilterValue) -> Self {
        Self::Value(value)
    }
}

impl From<Relation> for Operand<Relation> {
    fn from(relation: Relation) -> Self {
        Self::Query(relation)
    }
}

/// Reduce a candidate to a [`Condition`].
///
/// A missing or blank candidate stands in for `fallback`, so ORing can be
/// invoked with an implicit "self" operand. Conditions pass through
/// unchanged, queries contribute [`Scope::primary_condition`], and any other
/// value is a type mismatch.
pub fn normalize<Q: Scope>(candidate: Option<Operand<Q>>, fallback: &Q) -> SearchResult<Condition> {
    match candidate {
        None => Ok(fallback.primary_condition()),
        Some(operand) if operand.is_blank() => Ok(fallback.primary_condition()),
        Some(Operand::Query(query)) => Ok(query.primary_condition()),
        Some(Operand::Condition(condition)) => Ok(condition),
        Some(Operand::Value(value)) => Err(SearchError::type_mismatch(value.type_name(), &value)),
    }
}

/// A table-backed query holding a list of constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    table: SmolStr,
    constraints: Vec<Condition>,
}

impl Relation {
    /// An unconstrained query over `table`.
    pub fn new(table: impl Into<SmolStr>) -> Self {
        Self {
            table: table.into(),
            constraints: Vec::new(),
        }
    }

    /// The table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Add an equality constraint.
    pub fn where_eq(self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter(Condition::equals(column, value))
    }

    /// Whether a row satisfies every stored constraint.
    pub fn matches(&self, row: &Row) -> bool {
        self.constraints.iter().all(|c| c.matches(row))
    }

    /// Render `SELECT * FROM table [WHERE ...]`.
    pub fn to_sql(&self, db_type: DatabaseType) -> (String, Vec<FilterValue>) {
        let mut builder = SqlBuilder::new(db_type);
        builder.push("SELECT * FROM ").push_identifier(&self.table);
        if !self.constraints.is_empty() {
            builder.push(" WHERE ");
            let mut first = true;
            for constraint in &self.constraints {
                if !first {
                    builder.push(" AND ");
                }
                first = false;
                constraint.write_sql(&mut builder);
            }
        }
        builder.build()
    }
}

impl Scope for Relation {
    fn constraints(&self) -> &[Condition] {
        &self.constraints
    }

    fn filter(mut self, condition: Condition) -> Self {
        if !condition.is_none() {
            self.constraints.push(condition);
        }
        self
    }

    fn unscoped(&self) -> Self {
        Self::new(self.table.clone())
    }
}
