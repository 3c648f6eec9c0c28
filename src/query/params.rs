//! Raw list parameters and their coercion rules.

use serde::Deserialize;

use crate::common::config::{DEFAULT_LIMIT, DEFAULT_PAGE};

/// Query-string parameters of a list request, exactly as received.
///
/// Values stay strings until [`ListQuery::normalize`] so that garbage like
/// `limit=abc` falls back to a default instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQuery {
    /// Search text matched against name and category.
    pub q: Option<String>,

    /// Page size.
    pub limit: Option<String>,

    /// 1-based page number.
    pub page: Option<String>,
}

/// Coerced list parameters, ready for filtering and paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    /// Trimmed, lowercased search text. Empty matches everything.
    pub needle: String,
    /// Page size, at least 1.
    pub limit: usize,
    /// Requested page, at least 1. Not yet clamped to the result size.
    pub page: usize,
}

impl ListQuery {
    /// Build a query from already-typed values.
    pub fn new(q: impl Into<String>, limit: usize, page: usize) -> Self {
        Self {
            q: Some(q.into()),
            limit: Some(limit.to_string()),
            page: Some(page.to_string()),
        }
    }

    /// Apply defaults and floors.
    ///
    /// A value with no leading integer uses the default; anything parsed is
    /// raised to at least 1.
    pub fn normalize(&self) -> NormalizedQuery {
        NormalizedQuery {
            needle: self
                .q
                .as_deref()
                .map(|q| q.trim().to_lowercase())
                .unwrap_or_default(),
            limit: coerce_positive(self.limit.as_deref(), DEFAULT_LIMIT),
            page: coerce_positive(self.page.as_deref(), DEFAULT_PAGE),
        }
    }
}

fn coerce_positive(raw: Option<&str>, default: usize) -> usize {
    match raw.and_then(parse_leading_int) {
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        None => default,
    }
}

/// Read the integer at the start of `s`.
///
/// Leading whitespace is skipped, an optional sign is honoured, and parsing
/// stops at the first non-digit. Returns `None` when no digit follows.
/// Magnitudes beyond `i64` saturate.
///
/// ```
/// use catalogd::query::parse_leading_int;
///
/// assert_eq!(parse_leading_int(" 12px"), Some(12));
/// assert_eq!(parse_leading_int("-4"), Some(-4));
/// assert_eq!(parse_leading_int("2.9"), Some(2));
/// assert_eq!(parse_leading_int("px"), None);
/// ```
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen_digit.then_some(value)
}
