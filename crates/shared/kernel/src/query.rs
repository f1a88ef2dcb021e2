//! Filter-and-paginate engine over record collections.
//!
//! Every query parameter other than `page` and `limit` is a filter criterion. A record is
//! kept when, for every criterion, the field is absent, or it is text equal to the
//! criterion, or it is a number numerically equal to the criterion. Fields holding any
//! other kind of value never exclude a record. The kept records are then sliced to the
//! requested page. Nothing here fails: bad input degrades to defaults or to no match.

use crate::record::Record;
use billmock_domain::constants::{DEFAULT_LIMIT, DEFAULT_PAGE, LIMIT_PARAM, PAGE_PARAM};
use fxhash::FxHashMap;
use serde_json::Value;

/// Field name to expected textual value, as taken from the query string.
pub type FilterCriteria = FxHashMap<String, String>;

/// A parsed list request: filter criteria plus the page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    criteria: FilterCriteria,
    page: usize,
    limit: usize,
}

impl Default for RecordQuery {
    fn default() -> Self {
        Self { criteria: FilterCriteria::default(), page: DEFAULT_PAGE, limit: DEFAULT_LIMIT }
    }
}

impl RecordQuery {
    /// Splits raw query parameters into criteria and pagination.
    ///
    /// `page` and `limit` never become criteria. When a name repeats, the last value wins.
    pub fn from_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut criteria = FilterCriteria::default();
        let mut page = None;
        let mut limit = None;

        for (key, value) in params {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                PAGE_PARAM => page = Some(value),
                LIMIT_PARAM => limit = Some(value),
                _ => {
                    criteria.insert(key, value);
                },
            }
        }

        Self {
            criteria,
            page: coerce_window(page.as_deref(), DEFAULT_PAGE),
            limit: coerce_window(limit.as_deref(), DEFAULT_LIMIT),
        }
    }

    #[must_use]
    pub fn with_criterion(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.criteria.insert(field.into(), value.into());
        self
    }

    /// Sets the page; values below 1 are clamped to 1.
    #[must_use]
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size; values below 1 are clamped to 1.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Index of the first record on the requested page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Filters `records` and returns the requested page, in source order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records
            .iter()
            .filter(|record| record_matches(record, &self.criteria))
            .skip(self.offset())
            .take(self.limit)
            .collect()
    }
}

/// Keeps the records satisfying every criterion, preserving order.
#[must_use]
pub fn filter<'a>(records: &'a [Record], criteria: &FilterCriteria) -> Vec<&'a Record> {
    records.iter().filter(|record| record_matches(record, criteria)).collect()
}

/// Returns the `page`-th window of `limit` items (1-based), or an empty slice past the end.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, limit: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(limit);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(limit).min(items.len());
    &items[start..end]
}

/// True when `record` satisfies every criterion.
#[must_use]
pub fn record_matches(record: &Record, criteria: &FilterCriteria) -> bool {
    criteria
        .iter()
        .all(|(field, expected)| record.get(field).is_none_or(|value| field_matches(value, expected)))
}

/// Typed comparison of one stored value against a textual criterion.
#[must_use]
pub fn field_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(text) => text == expected,
        Value::Number(number) => match (number.as_f64(), coerce_number(expected)) {
            (Some(actual), Some(wanted)) => actual == wanted,
            _ => false,
        },
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => true,
    }
}

/// Converts query text to a number the way loose equality does.
///
/// Surrounding whitespace is ignored and empty text is zero. Accepts decimal and exponent
/// forms, `0x`/`0o`/`0b` integers, and `Infinity` with an optional sign. Returns `None`
/// for anything else.
#[must_use]
pub fn coerce_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {},
    }

    if let Some(value) = radix_literal(text) {
        return value;
    }

    let decimal_only =
        text.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal_only {
        return None;
    }
    text.parse::<f64>().ok()
}

/// `Some(result)` when `text` carries a radix prefix, `None` when it does not.
fn radix_literal(text: &str) -> Option<Option<f64>> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(None);
    }
    let mut value = 0.0_f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return Some(None);
        };
        value = value.mul_add(f64::from(radix), f64::from(digit));
    }
    Some(Some(value))
}

/// Resolves a `page`/`limit` value: integer-prefix parsing, defaulting when no number
/// can be read, clamped to at least 1.
#[must_use]
pub fn coerce_window(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(parse_int_prefix).map_or(default, |n| {
        if n < 1 { 1 } else { usize::try_from(n).unwrap_or(usize::MAX) }
    })
}

/// Reads the leading integer of `text`: leading whitespace, an optional sign, then digits
/// (hexadecimal after `0x`). Trailing garbage is ignored; saturates instead of overflowing.
#[must_use]
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for digit in digits.chars().map_while(|ch| ch.to_digit(radix)) {
        seen = true;
        value = value.saturating_mul(i64::from(radix)).saturating_add(i64::from(digit));
    }

    seen.then_some(if negative { -value } else { value })
}
