//! Integration tests for configuration parsing and handling.
//!
//! These tests verify that `searchable.toml` settings flow through to the
//! conditions a registry builds.

use pretty_assertions::assert_eq;
use searchable::query::{
    Combinator, Condition, DatabaseType, ErrorCode, FilterValue, Relation, Scope, SearchConfig,
    Searchable,
};

/// Test minimal configuration
#[test]
fn test_config_minimal() {
    let config = SearchConfig::from_str("").expect("Failed to parse config");
    assert_eq!(config, SearchConfig::default());
}

/// Test full configuration with all options
#[test]
fn test_config_full() {
    let config_str = r#"
        [search]
        trim_term = false
        case_insensitive = true
        escape_char = "!"
        combinator = "and"

        [sql]
        dialect = "mysql"

        [debug]
        log_skips = true
    "#;

    let config = SearchConfig::from_str(config_str).expect("Failed to parse config");
    assert!(!config.search.trim_term);
    assert!(config.search.case_insensitive);
    assert_eq!(config.search.escape_char, '!');
    assert_eq!(config.search.combinator, Combinator::And);
    assert_eq!(config.sql.dialect, DatabaseType::MySQL);
    assert!(config.debug.log_skips);
}

/// Test loading from a file on disk
#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("searchable.toml");
    std::fs::write(&path, "[search]\ncase_insensitive = true\n").expect("Failed to write config");

    let config = SearchConfig::from_file(&path).expect("Failed to load config");
    assert!(config.search.case_insensitive);
}

/// Test that a missing file reports an I/O configuration error
#[test]
fn test_config_missing_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = SearchConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigIo);
    assert!(err.is_config_error());
}

/// Test environment variable interpolation
#[test]
fn test_config_env_interpolation() {
    // SAFETY: This test runs single-threaded and we clean up after
    unsafe {
        std::env::set_var("SEARCHABLE_IT_DIALECT", "sqlite");
    }
    let config = SearchConfig::from_str("[sql]\ndialect = \"${SEARCHABLE_IT_DIALECT}\"")
        .expect("Failed to parse config");
    assert_eq!(config.sql.dialect, DatabaseType::SQLite);
    unsafe {
        std::env::remove_var("SEARCHABLE_IT_DIALECT");
    }
}

/// Test rejected values
#[test]
fn test_config_invalid_values() {
    for bad in [
        "[search]\nescape_char = \"_\"",
        "[search]\nescape_char = \" \"",
        "[search]\nescape_char = \"E\"",
        "[search]\ncombinator = \"xor\"",
        "[sql]\ndialect = \"oracle\"",
        "[cache]\nenabled = true",
    ] {
        let err = SearchConfig::from_str(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration, "{}", bad);
    }
}

/// The configured combinator drives `search_or_chain`
#[test]
fn test_config_combinator_applies() {
    let config = SearchConfig::from_str("[search]\ncombinator = \"and\"").unwrap();
    let users: Searchable<Relation> = Searchable::builder("User")
        .config(config)
        .pattern_filter("first", "first_name")
        .pattern_filter("last", "last_name")
        .build();

    let q = users
        .search_or_chain(Relation::new("users"), "ann", ["first", "last"])
        .unwrap();
    assert!(q.constraints()[0].is_conjunction());
}

/// Case-insensitive patterns render per dialect
#[test]
fn test_config_case_insensitive_sql() {
    let config = SearchConfig::from_str("[search]\ncase_insensitive = true").unwrap();
    let users: Searchable<Relation> = Searchable::builder("User").config(config).build();
    let q = users.simple_search(Relation::new("users"), "Ann", "name");

    let (sql, _) = q.to_sql(DatabaseType::PostgreSQL);
    assert_eq!(sql, "SELECT * FROM users WHERE name ILIKE $1 ESCAPE '\\'");

    let (sql, _) = q.to_sql(DatabaseType::SQLite);
    assert_eq!(sql, "SELECT * FROM users WHERE LOWER(name) LIKE ? ESCAPE '\\'");

    let mut row = searchable::query::Row::new();
    row.insert("name".into(), FilterValue::from("ANNA"));
    assert!(q.matches(&row));
    assert!(matches!(&q.constraints()[0], Condition::Like(_, p) if p.case_insensitive));
}
