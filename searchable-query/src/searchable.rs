//! Per-model search registry and entry points.
//!
//! A [`Searchable`] holds everything one model needs to turn a search term
//! into conditions: an optional validity rule, the named filters an OR chain
//! can refer to, and the configuration. It is built once and then shared.
//!
//! ```rust
//! use std::sync::LazyLock;
//! use searchable_query::{DatabaseType, Relation, Searchable};
//!
//! static USERS: LazyLock<Searchable<Relation>> = LazyLock::new(|| {
//!     Searchable::builder("User")
//!         .pattern_filter("name_filter", "name")
//!         .pattern_filter("email_filter", "email")
//!         .build()
//! });
//!
//! let base = Relation::new("users").where_eq("active", true);
//! let query = USERS
//!     .search_or_chain(base, "alice", ["name_filter", "email_filter"])
//!     .unwrap();
//!
//! let (sql, params) = query.to_sql(DatabaseType::PostgreSQL);
//! assert_eq!(
//!     sql,
//!     "SELECT * FROM users WHERE active = $1 AND (name LIKE $2 ESCAPE '\\' OR email LIKE $3 ESCAPE '\\')"
//! );
//! assert_eq!(params.len(), 3);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::chain::{self, ChainItem, ChainSpec, Combinator};
use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::filter::{Condition, Equalities, FilterValue};
use crate::pattern::PatternFragment;
use crate::scope::{self, Operand, Relation, Scope};
use crate::sql::DatabaseType;
use crate::term::{IntoSearchTerm, SearchTerm};

/// Custom validity check for a model's search terms.
///
/// Returns `true` when the term is valid and the filter should apply.
pub type FilterRule = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A named filter, called with an unconstrained query and the search term.
pub type NamedFilter<Q> = Arc<dyn Fn(Q, &str) -> Operand<Q> + Send + Sync>;

/// What [`Searchable::simple_search`] attaches.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    /// Column/value pairs, applied as equality filters. The term only gates.
    Equality(Equalities),
    /// A pattern fragment completed with the escaped, wrapped term.
    Pattern(PatternFragment),
}

impl From<Equalities> for QuerySpec {
    fn from(equalities: Equalities) -> Self {
        Self::Equality(equalities)
    }
}

impl From<PatternFragment> for QuerySpec {
    fn from(fragment: PatternFragment) -> Self {
        Self::Pattern(fragment)
    }
}

impl From<&str> for QuerySpec {
    fn from(column: &str) -> Self {
        Self::Pattern(PatternFragment::like(column))
    }
}

enum Registered<Q> {
    Custom(NamedFilter<Q>),
    Pattern(PatternFragment),
}

/// Builder for [`Searchable`].
pub struct SearchableBuilder<Q> {
    model: SmolStr,
    rule: Option<FilterRule>,
    filters: IndexMap<SmolStr, Registered<Q>>,
    config: SearchConfig,
}

impl<Q: Scope> SearchableBuilder<Q> {
    /// Replace the default "present and non-blank" validity check.
    pub fn filter_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rule = Some(Arc::new(rule));
        self
    }

    /// Register a filter an OR chain can refer to by name.
    pub fn named_filter<F>(self, name: impl Into<SmolStr>, filter: F) -> Self
    where
        F: Fn(Q, &str) -> Operand<Q> + Send + Sync + 'static,
    {
        self.register(name.into(), Registered::Custom(Arc::new(filter)))
    }

    /// Register a filter matching `column` against the term as a substring.
    ///
    /// The term is escaped and wrapped in `%` markers using the model's
    /// configured escape character, trimming and case sensitivity.
    pub fn pattern_filter(self, name: impl Into<SmolStr>, column: impl Into<PatternFragment>) -> Self {
        self.register(name.into(), Registered::Pattern(column.into()))
    }

    /// Use `config` instead of the defaults.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    fn register(mut self, name: SmolStr, filter: Registered<Q>) -> Self {
        if self.filters.insert(name.clone(), filter).is_some() {
            warn!(model = %self.model, filter = %name, "named filter registered twice; keeping the last");
        }
        self
    }

    /// Finish registration.
    pub fn build(self) -> Searchable<Q> {
        Searchable {
            model: self.model,
            rule: self.rule,
            filters: self.filters,
            config: self.config,
        }
    }
}

/// Search registry for one model.
pub struct Searchable<Q> {
    model: SmolStr,
    rule: Option<FilterRule>,
    filters: IndexMap<SmolStr, Registered<Q>>,
    config: SearchConfig,
}

impl<Q> fmt::Debug for Searchable<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searchable")
            .field("model", &self.model)
            .field("has_filter_rule", &self.rule.is_some())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}

impl<Q: Scope> Searchable<Q> {
    /// Start registering searches for `model`.
    pub fn builder(model: impl Into<SmolStr>) -> SearchableBuilder<Q> {
        SearchableBuilder {
            model: model.into(),
            rule: None,
            filters: IndexMap::new(),
            config: SearchConfig::default(),
        }
    }

    /// The model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The SQL dialect from `[sql] dialect`.
    pub fn dialect(&self) -> DatabaseType {
        self.config.sql.dialect
    }

    /// Render the query's combined WHERE condition in the configured dialect.
    pub fn where_sql(&self, query: &Q) -> (String, Vec<FilterValue>) {
        let dialect = self.dialect();
        debug!(model = %self.model, dialect = dialect.as_str(), "rendering where clause");
        query.primary_condition().to_sql(dialect)
    }

    /// Names of the registered filters, in registration order.
    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(SmolStr::as_str)
    }

    /// Whether a custom validity rule replaces the default check.
    pub fn has_filter_rule(&self) -> bool {
        self.rule.is_some()
    }

    /// Whether `term` should trigger filtering.
    ///
    /// The custom rule, if registered, decides alone. An absent term reads
    /// as the empty string there. The default check rejects absent and
    /// whitespace-only terms.
    pub fn is_valid_term(&self, term: &SearchTerm) -> bool {
        match &self.rule {
            Some(rule) => rule(term.as_str()),
            None => !term.is_blank(),
        }
    }

    /// Coerce and validate the input. `None` means skip.
    fn guard(&self, input: impl IntoSearchTerm) -> Option<SearchTerm> {
        let Some(term) = input.into_search_term() else {
            self.log_skip("term has no string form");
            return None;
        };
        if !self.is_valid_term(&term) {
            self.log_skip("term rejected by validity check");
            return None;
        }
        Some(term)
    }

    fn log_skip(&self, reason: &'static str) {
        if self.config.debug.log_skips {
            debug!(model = %self.model, reason, "search skipped");
        }
    }

    /// Run `on_valid` only when the input is a valid search term.
    ///
    /// Otherwise `base` comes back untouched and `on_valid` is never called.
    pub fn search_filter<F>(&self, base: Q, input: impl IntoSearchTerm, on_valid: F) -> Q
    where
        F: FnOnce(Q, &SearchTerm) -> Q,
    {
        match self.guard(input) {
            Some(term) => on_valid(base, &term),
            None => base,
        }
    }

    /// [`search_filter`](Self::search_filter) for fallible callbacks.
    pub fn try_search_filter<F>(&self, base: Q, input: impl IntoSearchTerm, on_valid: F) -> SearchResult<Q>
    where
        F: FnOnce(Q, &SearchTerm) -> SearchResult<Q>,
    {
        match self.guard(input) {
            Some(term) => on_valid(base, &term),
            None => Ok(base),
        }
    }

    /// Attach an equality mapping or a pattern match, gated by the guard.
    ///
    /// An equality mapping ignores the term's text. A pattern fragment is
    /// completed with the term escaped and wrapped as `%term%`.
    pub fn simple_search(&self, base: Q, input: impl IntoSearchTerm, spec: impl Into<QuerySpec>) -> Q {
        let spec = spec.into();
        self.search_filter(base, input, |base, term| match spec {
            QuerySpec::Equality(equalities) => base.filter_eq(equalities),
            QuerySpec::Pattern(fragment) => {
                let condition = self.pattern_condition(&base, &fragment, term.as_str());
                base.filter(condition)
            }
        })
    }

    fn pattern_condition(&self, scope: &Q, fragment: &PatternFragment, term: &str) -> Condition {
        let settings = &self.config.search;
        let term = if settings.trim_term { term.trim() } else { term };
        let escaped = scope.escape_pattern(term, settings.escape_char);
        let mut pattern = fragment.complete(format!("%{}%", escaped), settings.escape_char);
        pattern.case_insensitive |= settings.case_insensitive;
        Condition::Like(fragment.column.clone(), pattern)
    }

    /// Combine `items` into one condition and AND it onto `base`.
    ///
    /// The items are classified by their last element: a trailing filter
    /// name means every item is a registered filter called with the term,
    /// otherwise every item is a prebuilt operand. Items are folded with the
    /// configured combinator. A rejected term returns `base` before any
    /// classification happens.
    pub fn search_or_chain<I>(&self, base: Q, input: impl IntoSearchTerm, items: I) -> SearchResult<Q>
    where
        I: IntoIterator,
        I::Item: Into<ChainItem<Q>>,
    {
        let Some(term) = self.guard(input) else {
            return Ok(base);
        };
        let spec = ChainSpec::classify(items.into_iter().map(Into::into).collect())?;
        self.build_chain(base, &term, spec, self.config.search.combinator)
    }

    /// Like [`search_or_chain`](Self::search_or_chain) with an explicit
    /// chain shape and operator.
    pub fn search_chain_with(
        &self,
        base: Q,
        input: impl IntoSearchTerm,
        spec: ChainSpec<Q>,
        combinator: Combinator,
    ) -> SearchResult<Q> {
        match self.guard(input) {
            Some(term) => self.build_chain(base, &term, spec, combinator),
            None => Ok(base),
        }
    }

    /// OR a chain onto `base` without consulting the guard.
    pub fn or_chain(&self, base: Q, term: &SearchTerm, spec: ChainSpec<Q>) -> SearchResult<Q> {
        self.build_chain(base, term, spec, Combinator::Or)
    }

    fn build_chain(
        &self,
        base: Q,
        term: &SearchTerm,
        spec: ChainSpec<Q>,
        combinator: Combinator,
    ) -> SearchResult<Q> {
        crate::search_debug!(
            model = %self.model,
            items = spec.len(),
            combinator = combinator.as_str(),
            "building condition chain"
        );
        let conditions = self.chain_conditions(&base, term, spec)?;
        self.create_chain(base, conditions, combinator)
    }

    /// Resolve and normalize each chain item to a condition.
    ///
    /// Filters are called with `base.unscoped()` and the term; their results,
    /// like prebuilt operands, are normalized with `base` as the fallback.
    pub fn chain_conditions(
        &self,
        base: &Q,
        term: &SearchTerm,
        spec: ChainSpec<Q>,
    ) -> SearchResult<Vec<Condition>> {
        match spec {
            ChainSpec::Filters(names) => names
                .iter()
                .map(|name| {
                    let operand = self.call_filter(base, name, term)?;
                    scope::normalize(Some(operand), base)
                })
                .collect(),
            ChainSpec::Operands(operands) => operands
                .into_iter()
                .map(|operand| scope::normalize(Some(operand), base))
                .collect(),
        }
    }

    fn call_filter(&self, base: &Q, name: &str, term: &SearchTerm) -> SearchResult<Operand<Q>> {
        let filter = self
            .filters
            .get(name)
            .ok_or_else(|| SearchError::unknown_filter(self.model.as_str(), name))?;
        let scope = base.unscoped();
        Ok(match filter {
            Registered::Custom(filter) => filter(scope, term.as_str()),
            Registered::Pattern(fragment) => {
                Operand::Condition(self.pattern_condition(&scope, fragment, term.as_str()))
            }
        })
    }

    /// Fold `conditions` with `combinator` and AND the result onto `base`.
    pub fn create_chain(
        &self,
        base: Q,
        conditions: Vec<Condition>,
        combinator: Combinator,
    ) -> SearchResult<Q> {
        let chain = chain::fold(conditions, combinator)?;
        Ok(base.filter(chain))
    }
}

impl Searchable<Relation> {
    /// Render a full `SELECT` for `query` in the configured dialect.
    pub fn to_sql(&self, query: &Relation) -> (String, Vec<FilterValue>) {
        let dialect = self.dialect();
        debug!(model = %self.model, dialect = dialect.as_str(), "rendering query");
        query.to_sql(dialect)
    }
}
