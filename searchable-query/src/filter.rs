//! Condition types for building WHERE clauses.
//!
//! [`Condition`] is the single predicate representation every chain item is
//! normalized into before folding. It renders to parameterized SQL and can
//! also be evaluated in memory against a [`Row`].

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::pattern::{LikePattern, fold_case};
use crate::scope::{Operand, Scope};
use crate::sql::{DatabaseType, SqlBuilder};

/// A row of column values, used for in-memory evaluation.
pub type Row = IndexMap<String, FilterValue>;

/// Column to value pairs applied as ANDed equality filters.
pub type Equalities = IndexMap<String, FilterValue>;

/// A filter value that can be used in comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values.
    List(Vec<FilterValue>),
    /// JSON value. Last, so untagged deserialization only lands here for objects.
    Json(serde_json::Value),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null, or a string holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Stable lowercase name of the value's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Json(_) => "json",
            Self::List(_) => "list",
        }
    }

    /// Borrow the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// SQL-style equality: null never equals anything, ints and floats compare numerically.
    pub fn sql_eq(&self, other: &FilterValue) -> bool {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Json(v) => write!(f, "{}", v),
            Self::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

static NULL: FilterValue = FilterValue::Null;

/// A composable boolean constraint over a query's filter space.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// No constraint (always true).
    #[default]
    None,

    /// Equals comparison.
    Equals(String, FilterValue),
    /// Not equals comparison.
    NotEquals(String, FilterValue),

    /// Is null check.
    IsNull(String),
    /// Is not null check.
    IsNotNull(String),

    /// Pattern match against an escaped LIKE pattern.
    Like(String, LikePattern),

    /// Logical AND of multiple conditions.
    And(Vec<Condition>),
    /// Logical OR of multiple conditions.
    Or(Vec<Condition>),
    /// Logical NOT of a condition.
    Not(Box<Condition>),
}

impl Condition {
    /// Create an empty condition (matches everything).
    pub fn none() -> Self {
        Self::None
    }

    /// Check if this condition is empty.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Check if this is a conjunction node.
    pub fn is_conjunction(&self) -> bool {
        matches!(self, Self::And(_))
    }

    /// Check if this is a disjunction node.
    pub fn is_disjunction(&self) -> bool {
        matches!(self, Self::Or(_))
    }

    /// `column = value`.
    pub fn equals(column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Equals(column.into(), value.into())
    }

    /// `column LIKE pattern`.
    pub fn like(column: impl Into<String>, pattern: LikePattern) -> Self {
        Self::Like(column.into(), pattern)
    }

    /// `column LIKE '%term%'` with `term` escaped.
    pub fn contains(column: impl Into<String>, term: &str) -> Self {
        Self::Like(column.into(), LikePattern::contains(term))
    }

    /// Create an AND condition. Empty members are dropped.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut conditions: Vec<_> = conditions.into_iter().filter(|c| !c.is_none()).collect();
        match conditions.len() {
            0 => Self::None,
            1 => conditions.pop().unwrap_or_default(),
            _ => Self::And(conditions),
        }
    }

    /// Create an OR condition.
    ///
    /// An empty member matches every row, so it absorbs the whole disjunction.
    /// No members at all is an empty disjunction, which matches nothing.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut conditions: Vec<_> = conditions.into_iter().collect();
        if conditions.iter().any(Self::is_none) {
            return Self::None;
        }
        match conditions.len() {
            0 => Self::Or(Vec::new()),
            1 => conditions.pop().unwrap_or_default(),
            _ => Self::Or(conditions),
        }
    }

    /// Create a NOT condition.
    pub fn not(condition: Condition) -> Self {
        if condition.is_none() {
            return Self::None;
        }
        Self::Not(Box::new(condition))
    }

    /// Combine with another condition using AND.
    ///
    /// Flattens one level when `self` is already a conjunction.
    pub fn and_then(self, other: Condition) -> Self {
        if self.is_none() {
            return other;
        }
        if other.is_none() {
            return self;
        }
        match self {
            Self::And(mut conditions) => {
                conditions.push(other);
                Self::And(conditions)
            }
            _ => Self::And(vec![self, other]),
        }
    }

    /// Combine with another condition using OR.
    ///
    /// Flattens one level when `self` is already a disjunction, so a
    /// left fold over `a, b, c` yields a single `(a OR b OR c)` group.
    pub fn or_with(self, other: Condition) -> Self {
        if self.is_none() || other.is_none() {
            return Self::None;
        }
        match self {
            Self::Or(mut conditions) => {
                conditions.push(other);
                Self::Or(conditions)
            }
            _ => Self::Or(vec![self, other]),
        }
    }

    /// OR with the right-hand side of a chain step.
    ///
    /// A query contributes its primary condition and a condition is used
    /// as is. A raw value has no condition form and is rejected.
    pub fn or_operand<Q: Scope>(self, right: Operand<Q>) -> SearchResult<Self> {
        match right {
            Operand::Query(query) => Ok(self.or_with(query.primary_condition())),
            Operand::Condition(condition) => Ok(self.or_with(condition)),
            Operand::Value(value) => Err(SearchError::unsupported_operand(value.type_name())),
        }
    }

    /// Generate SQL for this condition with parameter placeholders.
    /// Returns (sql, params) where params are the values to bind.
    pub fn to_sql(&self, db_type: DatabaseType) -> (String, Vec<FilterValue>) {
        let mut builder = SqlBuilder::new(db_type);
        self.write_sql(&mut builder);
        builder.build()
    }

    /// Append this condition to an in-progress SQL builder.
    pub fn write_sql(&self, builder: &mut SqlBuilder) {
        match self {
            Self::None => {
                builder.push("TRUE");
            }

            Self::Equals(col, val) => {
                builder.push_identifier(col);
                if val.is_null() {
                    builder.push(" IS NULL");
                } else {
                    builder.push(" = ").push_param(val.clone());
                }
            }
            Self::NotEquals(col, val) => {
                builder.push_identifier(col);
                if val.is_null() {
                    builder.push(" IS NOT NULL");
                } else {
                    builder.push(" != ").push_param(val.clone());
                }
            }

            Self::IsNull(col) => {
                builder.push_identifier(col).push(" IS NULL");
            }
            Self::IsNotNull(col) => {
                builder.push_identifier(col).push(" IS NOT NULL");
            }

            Self::Like(col, pattern) => {
                let db_type = builder.db_type();
                if pattern.case_insensitive && db_type.supports_ilike() {
                    let param = FilterValue::String(pattern.pattern.clone());
                    builder.push_identifier(col).push(" ILIKE ").push_param(param);
                } else if pattern.case_insensitive {
                    // Fold in Rust so escape sequences survive lowercasing.
                    let param = FilterValue::String(fold_case(&pattern.pattern, pattern.escape));
                    builder
                        .push("LOWER(")
                        .push_identifier(col)
                        .push(") LIKE ")
                        .push_param(param);
                } else {
                    let param = FilterValue::String(pattern.pattern.clone());
                    builder.push_identifier(col).push(" LIKE ").push_param(param);
                }
                builder.push(" ").push(db_type.escape_clause(pattern.escape));
            }

            Self::And(conditions) => Self::write_group(builder, conditions, " AND ", "TRUE"),
            Self::Or(conditions) => Self::write_group(builder, conditions, " OR ", "FALSE"),
            Self::Not(condition) => {
                builder.push("NOT (");
                condition.write_sql(builder);
                builder.push(")");
            }
        }
    }

    fn write_group(builder: &mut SqlBuilder, conditions: &[Condition], sep: &str, empty: &str) {
        if conditions.is_empty() {
            builder.push(empty);
            return;
        }
        builder.push("(");
        for (i, condition) in conditions.iter().enumerate() {
            if i > 0 {
                builder.push(sep);
            }
            condition.write_sql(builder);
        }
        builder.push(")");
    }

    /// Evaluate this condition against a row in memory.
    ///
    /// Missing columns read as null.
    pub fn matches(&self, row: &Row) -> bool {
        let get = |col: &str| row.get(col).unwrap_or(&NULL);
        match self {
            Self::None => true,
            Self::Equals(col, FilterValue::Null) | Self::IsNull(col) => get(col).is_null(),
            Self::NotEquals(col, FilterValue::Null) | Self::IsNotNull(col) => !get(col).is_null(),
            Self::Equals(col, val) => get(col).sql_eq(val),
            Self::NotEquals(col, val) => {
                let field = get(col);
                !field.is_null() && !field.sql_eq(val)
            }
            Self::Like(col, pattern) => get(col).as_str().is_some_and(|s| pattern.matches(s)),
            Self::And(conditions) => conditions.iter().all(|c| c.matches(row)),
            Self::Or(conditions) => conditions.iter().any(|c| c.matches(row)),
            Self::Not(condition) => !condition.matches(row),
        }
    }
}
