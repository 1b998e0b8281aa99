//! LIKE pattern escaping and matching.
//!
//! Search terms come from users, so `%` and `_` inside a term must match
//! literally. [`escape_like`] prefixes each wildcard (and the escape
//! character itself) with the escape character, and every rendered LIKE
//! carries an explicit `ESCAPE` clause naming that character.
//!
//! ```rust
//! use searchable_query::pattern::{contains_pattern, like_match};
//!
//! let pattern = contains_pattern("50%_off", '\\');
//! assert_eq!(pattern, "%50\\%\\_off%");
//! assert!(like_match("get 50%_off today", &pattern, '\\', false));
//! assert!(!like_match("get 50 off today", &pattern, '\\', false));
//! ```

use serde::{Deserialize, Serialize};

/// The escape character used when none is configured.
pub const DEFAULT_ESCAPE: char = '\\';

/// Escape LIKE wildcards in `term` so it matches literally.
pub fn escape_like(term: &str, escape: char) -> String {
    let mut escaped = String::with_capacity(term.len() + 4);
    for c in term.chars() {
        if c == '%' || c == '_' || c == escape {
            escaped.push(escape);
        }
        escaped.push(c);
    }
    escaped
}

/// Escape `term` and wrap it in `%` markers for substring matching.
pub fn contains_pattern(term: &str, escape: char) -> String {
    format!("%{}%", escape_like(term, escape))
}

/// Pattern operator used by a [`PatternFragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternOp {
    /// Case-sensitive `LIKE`.
    #[default]
    Like,
    /// Case-insensitive match (`ILIKE` on PostgreSQL).
    ILike,
}

impl PatternOp {
    /// Whether this operator ignores case.
    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, Self::ILike)
    }
}

/// A partial condition of the form `column LIKE ?` awaiting a search term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternFragment {
    /// Column the pattern is matched against.
    pub column: String,
    /// Operator.
    pub op: PatternOp,
}

impl PatternFragment {
    /// `column LIKE ?`.
    pub fn like(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: PatternOp::Like,
        }
    }

    /// `column ILIKE ?`.
    pub fn ilike(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: PatternOp::ILike,
        }
    }

    /// Complete the fragment with an already escaped pattern.
    pub fn complete(&self, pattern: String, escape: char) -> LikePattern {
        LikePattern {
            pattern,
            escape,
            case_insensitive: self.op.is_case_insensitive(),
        }
    }
}

impl From<&str> for PatternFragment {
    fn from(column: &str) -> Self {
        Self::like(column)
    }
}

impl From<String> for PatternFragment {
    fn from(column: String) -> Self {
        Self::like(column)
    }
}

/// A finished LIKE pattern, ready to bind as a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LikePattern {
    /// Pattern text with wildcards and escapes.
    pub pattern: String,
    /// Escape character named in the `ESCAPE` clause.
    pub escape: char,
    /// Match without regard to case.
    pub case_insensitive: bool,
}

impl LikePattern {
    /// A case-sensitive pattern using the default escape character.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            escape: DEFAULT_ESCAPE,
            case_insensitive: false,
        }
    }

    /// Substring pattern for a raw user term.
    pub fn contains(term: &str) -> Self {
        Self::new(contains_pattern(term, DEFAULT_ESCAPE))
    }

    /// Make the pattern case-insensitive.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    /// Test a value against this pattern.
    pub fn matches(&self, value: &str) -> bool {
        like_match(value, &self.pattern, self.escape, self.case_insensitive)
    }
}

/// Match `value` against a SQL LIKE `pattern`.
///
/// `%` matches any run of characters, `_` exactly one, and the escape
/// character makes the following character literal.
pub fn like_match(value: &str, pattern: &str, escape: char, case_insensitive: bool) -> bool {
    if case_insensitive {
        let value: Vec<char> = value.chars().flat_map(char::to_lowercase).collect();
        let tokens = tokenize(&fold_case(pattern, escape), escape);
        return match_tokens(&value, &tokens);
    }
    let value: Vec<char> = value.chars().collect();
    match_tokens(&value, &tokenize(pattern, escape))
}

/// Lowercase the literal characters of a LIKE `pattern`.
///
/// Escape sequences are resolved before folding, so the escape character
/// keeps its meaning even when it is a letter. A folded literal that
/// collides with `%`, `_` or the escape character is re-escaped. Matching
/// the result against a lowercased value is a case-insensitive match.
///
/// ```rust
/// use searchable_query::pattern::fold_case;
///
/// assert_eq!(fold_case("%Ann\\_%", '\\'), "%ann\\_%");
/// assert_eq!(fold_case("%aE_B%", 'E'), "%aE_b%");
/// ```
pub fn fold_case(pattern: &str, escape: char) -> String {
    let mut folded = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let literal = if c == escape {
            match chars.next() {
                Some(next) => next,
                None => {
                    folded.push(escape);
                    break;
                }
            }
        } else if c == '%' || c == '_' {
            folded.push(c);
            continue;
        } else {
            c
        };
        for lower in literal.to_lowercase() {
            if lower == '%' || lower == '_' || lower == escape {
                folded.push(escape);
            }
            folded.push(lower);
        }
    }
    folded
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Any,
    One,
    Literal(char),
}

fn tokenize(pattern: &str, escape: char) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        let token = if c == escape {
            // A trailing escape matches itself.
            Token::Literal(chars.next().unwrap_or(escape))
        } else if c == '%' {
            Token::Any
        } else if c == '_' {
            Token::One
        } else {
            Token::Literal(c)
        };
        tokens.push(token);
    }
    tokens
}

// Iterative wildcard matching with single-point backtracking on the last `%`.
fn match_tokens(value: &[char], tokens: &[Token]) -> bool {
    let (mut v, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while v < value.len() {
        match tokens.get(t) {
            Some(Token::Any) => {
                star = Some((t, v));
                t += 1;
            }
            Some(Token::One) => {
                v += 1;
                t += 1;
            }
            Some(Token::Literal(c)) if *c == value[v] => {
                v += 1;
                t += 1;
            }
            _ => match star {
                Some((star_t, star_v)) => {
                    t = star_t + 1;
                    v = star_v + 1;
                    star = Some((star_t, star_v + 1));
                }
                None => return false,
            },
        }
    }

    tokens[t..].iter().all(|token| *token == Token::Any)
}
