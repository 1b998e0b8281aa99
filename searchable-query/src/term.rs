//! Search term coercion.
//!
//! Search terms usually arrive straight from request parameters. Anything
//! with a natural string form becomes a [`SearchTerm`]; values without one
//! (JSON objects and arrays, lists) coerce to `None`, which the guard treats
//! as "apply no filter".

use std::borrow::Cow;
use std::fmt;

use crate::filter::FilterValue;

/// A caller-supplied search term, possibly absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SearchTerm {
    raw: Option<String>,
}

impl SearchTerm {
    /// A present term.
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    /// An absent term.
    pub fn absent() -> Self {
        Self { raw: None }
    }

    /// Whether a term was supplied at all.
    pub fn is_present(&self) -> bool {
        self.raw.is_some()
    }

    /// Absent, or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.raw.as_deref().is_none_or(|raw| raw.trim().is_empty())
    }

    /// The term as given; an absent term reads as the empty string.
    pub fn as_str(&self) -> &str {
        self.raw.as_deref().unwrap_or("")
    }

    /// The term with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.as_str().trim()
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion into a [`SearchTerm`].
///
/// Returns `None` when the value has no string form.
pub trait IntoSearchTerm {
    /// Coerce into a search term.
    fn into_search_term(self) -> Option<SearchTerm>;
}

impl IntoSearchTerm for SearchTerm {
    fn into_search_term(self) -> Option<SearchTerm> {
        Some(self)
    }
}

impl IntoSearchTerm for &SearchTerm {
    fn into_search_term(self) -> Option<SearchTerm> {
        Some(self.clone())
    }
}

impl IntoSearchTerm for &str {
    fn into_search_term(self) -> Option<SearchTerm> {
        Some(SearchTerm::new(self))
    }
}

impl IntoSearchTerm for String {
    fn into_search_term(self) -> Option<SearchTerm> {
        Some(SearchTerm::new(self))
    }
}

impl IntoSearchTerm for &String {
    fn into_search_term(self) -> Option<SearchTerm> {
        Some(SearchTerm::new(self.as_str()))
    }
}

impl IntoSearchTerm for Cow<'_, str> {
    fn into_search_term(self) -> Option<SearchTerm> {
        Some(SearchTerm::new(self.into_owned()))
    }
}

macro_rules! display_search_term {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoSearchTerm for $ty {
                fn into_search_term(self) -> Option<SearchTerm> {
                    Some(SearchTerm::new(self.to_string()))
                }
            }
        )*
    };
}

display_search_term!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl<T: IntoSearchTerm> IntoSearchTerm for Option<T> {
    fn into_search_term(self) -> Option<SearchTerm> {
        match self {
            Some(value) => value.into_search_term(),
            None => Some(SearchTerm::absent()),
        }
    }
}

impl IntoSearchTerm for FilterValue {
    fn into_search_term(self) -> Option<SearchTerm> {
        match self {
            Self::Null => Some(SearchTerm::absent()),
            Self::Bool(v) => v.into_search_term(),
            Self::Int(v) => v.into_search_term(),
            Self::Float(v) => v.into_search_term(),
            Self::String(v) => Some(SearchTerm::new(v)),
            Self::Json(v) => v.into_search_term(),
            Self::List(_) => None,
        }
    }
}

impl IntoSearchTerm for serde_json::Value {
    fn into_search_term(self) -> Option<SearchTerm> {
        use serde_json::Value;

        match self {
            Value::Null => Some(SearchTerm::absent()),
            Value::Bool(v) => v.into_search_term(),
            Value::Number(n) => Some(SearchTerm::new(n.to_string())),
            Value::String(s) => Some(SearchTerm::new(s)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}
