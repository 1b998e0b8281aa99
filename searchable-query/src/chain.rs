//! Chain classification and folding.
//!
//! A chain is either a list of registered filter names, each resolved with
//! the search term, or a list of prebuilt operands. [`ChainSpec`] makes that
//! choice explicit; [`ChainSpec::classify`] derives it from a mixed item
//! list by looking at the last item.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::trace;

use crate::error::{SearchError, SearchResult};
use crate::filter::Condition;
use crate::scope::{Operand, Relation};

/// One argument to an OR chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainItem<Q> {
    /// The name of a registered filter.
    Filter(SmolStr),
    /// A query, condition or value to combine directly.
    Operand(Operand<Q>),
}

impl<Q> ChainItem<Q> {
    /// Reference a registered filter by name.
    pub fn filter(name: impl Into<SmolStr>) -> Self {
        Self::Filter(name.into())
    }

    /// Whether this item names a filter.
    pub fn is_filter(&self) -> bool {
        matches!(self, Self::Filter(_))
    }
}

impl<Q> From<&str> for ChainItem<Q> {
    fn from(name: &str) -> Self {
        Self::Filter(name.into())
    }
}

impl<Q> From<SmolStr> for ChainItem<Q> {
    fn from(name: SmolStr) -> Self {
        Self::Filter(name)
    }
}

impl<Q> From<Operand<Q>> for ChainItem<Q> {
    fn from(operand: Operand<Q>) -> Self {
        Self::Operand(operand)
    }
}

impl<Q> From<Condition> for ChainItem<Q> {
    fn from(condition: Condition) -> Self {
        Self::Operand(Operand::Condition(condition))
    }
}

impl From<Relation> for ChainItem<Relation> {
    fn from(relation: Relation) -> Self {
        Self::Operand(Operand::Query(relation))
    }
}

/// What an OR chain combines.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainSpec<Q> {
    /// Registered filters, each invoked with the search term.
    Filters(Vec<SmolStr>),
    /// Prebuilt operands, normalized and combined as given.
    Operands(Vec<Operand<Q>>),
}

impl<Q> ChainSpec<Q> {
    /// Classify a mixed item list.
    ///
    /// If the last item names a filter, every item must name a filter.
    /// Otherwise every item must be an operand. An empty list classifies as
    /// an empty operand list and fails later when folded.
    pub fn classify(items: Vec<ChainItem<Q>>) -> SearchResult<Self> {
        let with_filters = items.last().is_some_and(ChainItem::is_filter);

        if with_filters {
            let names = items
                .into_iter()
                .map(|item| match item {
                    ChainItem::Filter(name) => Ok(name),
                    ChainItem::Operand(operand) => {
                        Err(SearchError::mixed_chain(operand.type_name(), "filter name"))
                    }
                })
                .collect::<SearchResult<Vec<_>>>()?;
            return Ok(Self::Filters(names));
        }

        let operands = items
            .into_iter()
            .map(|item| match item {
                ChainItem::Operand(operand) => Ok(operand),
                ChainItem::Filter(name) => Err(SearchError::mixed_chain("filter name", "operand")
                    .with_filter(name.as_str())
                    .with_suggestion("Put filter names last, or pass only prebuilt conditions")),
            })
            .collect::<SearchResult<Vec<_>>>()?;
        Ok(Self::Operands(operands))
    }

    /// Number of items in the chain.
    pub fn len(&self) -> usize {
        match self {
            Self::Filters(names) => names.len(),
            Self::Operands(operands) => operands.len(),
        }
    }

    /// Whether the chain has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Operator used to fold a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Logical OR.
    #[default]
    Or,
    /// Logical AND.
    And,
}

impl Combinator {
    /// Combine two conditions.
    pub fn apply(&self, left: Condition, right: Condition) -> Condition {
        match self {
            Self::Or => left.or_with(right),
            Self::And => left.and_then(right),
        }
    }

    /// SQL keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
        }
    }
}

/// Fold conditions left to right, seeded with the first.
pub fn fold(
    conditions: impl IntoIterator<Item = Condition>,
    combinator: Combinator,
) -> SearchResult<Condition> {
    let mut conditions = conditions.into_iter();
    let seed = conditions.next().ok_or_else(SearchError::empty_chain)?;

    Ok(conditions.enumerate().fold(seed, |chain, (i, next)| {
        trace!(step = i + 1, combinator = combinator.as_str(), "folding condition");
        combinator.apply(chain, next)
    }))
}
