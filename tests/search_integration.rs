//! Integration tests for guarded search and OR chains.
//!
//! These tests exercise the public surface end to end:
//! - Guard behavior for blank, absent and uncoercible terms
//! - Equality and pattern dispatch in `simple_search`
//! - OR chains over named filters and prebuilt operands
//! - Error reporting for malformed chains

use std::sync::LazyLock;

use pretty_assertions::assert_eq;
use searchable::query::{
    ChainItem, ChainSpec, Combinator, Condition, DatabaseType, Equalities, FilterValue, Operand,
    Relation, Row, Scope, SearchTerm, Searchable, normalize,
};

static POSTS: LazyLock<Searchable<Relation>> = LazyLock::new(|| {
    Searchable::builder("Post")
        .pattern_filter("title_filter", "title")
        .pattern_filter("body_filter", "body")
        .named_filter("author_filter", |q: Relation, term| {
            Operand::Query(q.where_eq("author", term.trim()))
        })
        .build()
});

fn published() -> Relation {
    Relation::new("posts").where_eq("published", true)
}

fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), FilterValue::from(*v)))
        .collect()
}

/// The guard returns the base query for every blank input.
#[test]
fn test_blank_terms_leave_query_untouched() {
    let base = published();
    for term in ["", " ", "\n\t "] {
        assert_eq!(POSTS.simple_search(base.clone(), term, "title"), base);
        assert_eq!(
            POSTS
                .search_or_chain(base.clone(), term, ["title_filter", "body_filter"])
                .unwrap(),
            base
        );
    }
    assert_eq!(POSTS.simple_search(base.clone(), None::<String>, "title"), base);
    assert_eq!(POSTS.simple_search(base.clone(), SearchTerm::absent(), "title"), base);
}

/// Values with no string form are skipped silently.
#[test]
fn test_uncoercible_terms_are_skipped() {
    let base = published();
    let list = FilterValue::List(vec![FilterValue::Int(1)]);
    assert_eq!(POSTS.simple_search(base.clone(), list, "title"), base);
    assert_eq!(
        POSTS.simple_search(base.clone(), serde_json::json!([1, 2]), "title"),
        base
    );
}

/// Numbers are coerced to their string form.
#[test]
fn test_numeric_terms_are_searched() {
    let q = POSTS.simple_search(published(), 2024i64, "title");
    let (_, params) = q.to_sql(DatabaseType::PostgreSQL);
    assert_eq!(params[1], FilterValue::String("%2024%".into()));
}

/// An equality mapping adds exactly its pairs.
#[test]
fn test_equality_mapping() {
    let mut eqs = Equalities::new();
    eqs.insert("category".into(), "rust".into());
    eqs.insert("featured".into(), FilterValue::Bool(true));

    let q = POSTS.simple_search(published(), "ignored", eqs);
    let (sql, params) = q.to_sql(DatabaseType::SQLite);
    assert_eq!(
        sql,
        "SELECT * FROM posts WHERE published = ? AND category = ? AND featured = ?"
    );
    assert_eq!(
        params,
        vec![
            FilterValue::Bool(true),
            FilterValue::String("rust".into()),
            FilterValue::Bool(true),
        ]
    );
}

/// User wildcards match literally.
#[test]
fn test_pattern_search_escapes_wildcards() {
    let q = POSTS.simple_search(Relation::new("posts"), "100%", "title");
    assert!(q.matches(&row(&[("title", "100% rust")])));
    assert!(!q.matches(&row(&[("title", "1000 rust")])));

    let q = POSTS.simple_search(Relation::new("posts"), "a_b", "title");
    assert!(q.matches(&row(&[("title", "xa_by")])));
    assert!(!q.matches(&row(&[("title", "xacby")])));
}

/// The canonical two-filter OR chain.
#[test]
fn test_or_chain_sql() {
    let q = POSTS
        .search_or_chain(published(), "alice", ["title_filter", "body_filter"])
        .unwrap();
    let (sql, params) = q.to_sql(DatabaseType::PostgreSQL);
    assert_eq!(
        sql,
        "SELECT * FROM posts WHERE published = $1 AND (title LIKE $2 ESCAPE '\\' OR body LIKE $3 ESCAPE '\\')"
    );
    assert_eq!(params.len(), 3);

    let (sql, _) = q.to_sql(DatabaseType::MySQL);
    assert_eq!(
        sql,
        "SELECT * FROM posts WHERE published = ? AND (title LIKE ? ESCAPE '\\\\' OR body LIKE ? ESCAPE '\\\\')"
    );
}

/// The OR group is ANDed with the existing constraints, not ORed with them.
#[test]
fn test_or_chain_keeps_base_constraints() {
    let q = POSTS
        .search_or_chain(published(), "rust", ["title_filter", "body_filter", "author_filter"])
        .unwrap();

    let mut draft = row(&[("title", "rust tips"), ("body", "")]);
    draft.insert("published".into(), FilterValue::Bool(false));
    assert!(!q.matches(&draft));

    let mut post = row(&[("title", "go"), ("body", ""), ("author", "rust")]);
    post.insert("published".into(), FilterValue::Bool(true));
    assert!(q.matches(&post));
}

/// Left-to-right folding matches the regrouped chain on every row.
#[test]
fn test_fold_grouping_is_equivalent() {
    let term = SearchTerm::new("x");
    let base = Relation::new("posts");
    let conds = POSTS
        .chain_conditions(
            &base,
            &term,
            ChainSpec::Filters(vec!["title_filter".into(), "body_filter".into(), "author_filter".into()]),
        )
        .unwrap();
    let (a, b, c) = (conds[0].clone(), conds[1].clone(), conds[2].clone());

    let left = a.clone().or_with(b.clone()).or_with(c.clone());
    let right = a.or_with(b.or_with(c));

    for title in ["x", "-"] {
        for body in ["x", "-"] {
            for author in ["x", "-"] {
                let r = row(&[("title", title), ("body", body), ("author", author)]);
                assert_eq!(left.matches(&r), right.matches(&r));
            }
        }
    }
}

/// Prebuilt queries and conditions combine directly.
#[test]
fn test_operand_chain() {
    let drafts = Relation::new("posts").where_eq("published", false);
    let items: Vec<ChainItem<Relation>> = vec![
        drafts.into(),
        Condition::equals("pinned", true).into(),
    ];
    let q = POSTS
        .search_or_chain(Relation::new("posts"), "anything", items)
        .unwrap();
    let (sql, _) = q.to_sql(DatabaseType::PostgreSQL);
    assert_eq!(sql, "SELECT * FROM posts WHERE (published = $1 OR pinned = $2)");
}

#[test]
fn test_and_combinator() {
    let q = POSTS
        .search_chain_with(
            Relation::new("posts"),
            "rust",
            ChainSpec::Filters(vec!["title_filter".into(), "body_filter".into()]),
            Combinator::And,
        )
        .unwrap();
    assert!(q.matches(&row(&[("title", "rust"), ("body", "more rust")])));
    assert!(!q.matches(&row(&[("title", "rust"), ("body", "go")])));
}

#[test]
fn test_chain_errors() {
    let empty: Vec<ChainItem<Relation>> = Vec::new();
    assert!(POSTS.search_or_chain(published(), "x", empty).unwrap_err().is_empty_chain());

    let err = POSTS.search_or_chain(published(), "x", ["tag_filter"]).unwrap_err();
    assert!(err.is_unknown_filter());
    assert!(err.display_full().contains("tag_filter"));

    let mixed: Vec<ChainItem<Relation>> = vec![Condition::equals("a", 1i64).into(), "title_filter".into()];
    assert!(POSTS.search_or_chain(published(), "x", mixed).unwrap_err().is_type_mismatch());
}

#[test]
fn test_normalize_and_or_with() {
    let base = published();
    let err = normalize(Some(Operand::Value(FilterValue::Int(42))), &base).unwrap_err();
    assert!(err.is_type_mismatch());
    assert!(err.to_string().contains("integer"));

    let err = base.or_with(Operand::Value(FilterValue::Int(42))).unwrap_err();
    assert!(err.is_unsupported_operand());

    let cond = base.or_with(Operand::Query(Relation::new("posts").where_eq("pinned", true))).unwrap();
    assert_eq!(normalize(Some(Operand::Condition(cond.clone())), &base).unwrap(), cond);
}

#[test]
fn test_custom_rule() {
    let tags: Searchable<Relation> = Searchable::builder("Tag")
        .filter_rule(|term| term.starts_with('#'))
        .pattern_filter("name_filter", "name")
        .build();
    let base = Relation::new("tags");

    assert_eq!(tags.search_or_chain(base.clone(), "rust", ["name_filter"]).unwrap(), base);
    assert_ne!(tags.search_or_chain(base.clone(), "#rust", ["name_filter"]).unwrap(), base);
}

#[test]
fn test_registry_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                POSTS
                    .search_or_chain(published(), format!("term{}", i), ["title_filter"])
                    .map(|q| q.constraints().len())
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 2);
    }
}

/// The re-exported debug macro expands without a direct `tracing` dependency
#[test]
fn test_search_debug_macro_from_facade() {
    let model = "Post";
    searchable::search_debug!(model, items = 2, "building condition chain");
    searchable::search_debug!("no fields");
}

/// `Condition::or_operand` accepts queries from the facade
#[test]
fn test_condition_or_operand() {
    let drafts = Relation::new("posts").where_eq("published", false);
    let either = Condition::equals("pinned", true)
        .or_operand(Operand::Query(drafts))
        .unwrap();
    let (sql, params) = either.to_sql(DatabaseType::SQLite);
    assert_eq!(sql, "(pinned = ? OR published = ?)");
    assert_eq!(params, vec![FilterValue::Bool(true), FilterValue::Bool(false)]);
}
