//! Fuzz target for condition folding and rendering.
//!
//! Generates arbitrary condition trees, folds them into OR chains and
//! renders them for every dialect to find panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_condition_chain
//! ```

#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use searchable_query::{Combinator, Condition, DatabaseType, FilterValue, Row, fold};

/// A fuzzable filter value.
#[derive(Debug, Arbitrary, Clone)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<FuzzValue> for FilterValue {
    fn from(val: FuzzValue) -> Self {
        match val {
            FuzzValue::Null => FilterValue::Null,
            FuzzValue::Bool(b) => FilterValue::Bool(b),
            FuzzValue::Int(i) => FilterValue::Int(i),
            FuzzValue::Float(f) => FilterValue::Float(f),
            FuzzValue::String(s) => FilterValue::String(s),
        }
    }
}

/// A fuzzable condition.
#[derive(Debug, Arbitrary)]
enum FuzzCondition {
    None,
    Equals(String, FuzzValue),
    NotEquals(String, FuzzValue),
    IsNull(String),
    Contains(String, String),
    And(Vec<FuzzCondition>),
    Or(Vec<FuzzCondition>),
    Not(Box<FuzzCondition>),
}

impl FuzzCondition {
    fn to_condition(self, depth: usize) -> Condition {
        // Limit recursion depth to prevent stack overflow
        if depth > 8 {
            return Condition::None;
        }

        match self {
            FuzzCondition::None => Condition::None,
            FuzzCondition::Equals(col, val) => Condition::Equals(col, val.into()),
            FuzzCondition::NotEquals(col, val) => Condition::NotEquals(col, val.into()),
            FuzzCondition::IsNull(col) => Condition::IsNull(col),
            FuzzCondition::Contains(col, term) => Condition::contains(col, &term),
            FuzzCondition::And(children) => Condition::and(
                children.into_iter().take(8).map(|c| c.to_condition(depth + 1)),
            ),
            FuzzCondition::Or(children) => Condition::or(
                children.into_iter().take(8).map(|c| c.to_condition(depth + 1)),
            ),
            FuzzCondition::Not(child) => Condition::not(child.to_condition(depth + 1)),
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(items) = Vec::<FuzzCondition>::arbitrary(&mut unstructured) else {
        return;
    };
    let conditions: Vec<Condition> = items.into_iter().take(16).map(|c| c.to_condition(0)).collect();
    let was_empty = conditions.is_empty();

    match fold(conditions, Combinator::Or) {
        Ok(chain) => {
            for db in [DatabaseType::PostgreSQL, DatabaseType::MySQL, DatabaseType::SQLite] {
                let _ = chain.to_sql(db);
            }
            let _ = chain.matches(&Row::new());
        }
        Err(err) => assert!(was_empty && err.is_empty_chain()),
    }
});
