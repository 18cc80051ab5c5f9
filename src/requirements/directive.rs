//! Configuration-directive checks.
//!
//! A directive check compares the runtime's current value for a named
//! configuration directive against an expectation: either a literal (with
//! type-aware normalization of the raw string) or an arbitrary predicate.
//! With `approximate` set, an unset/empty directive also counts as
//! fulfilled, whatever the expectation says.
//!
//! Raw directive values arrive as strings. Two normalizations matter:
//!
//! - Boolean-like directives are reported as `"0"`/`"1"`/`"on"`/`"off"`/`""`
//!   depending on how they were written; comparing those raw strings against
//!   a boolean expectation is a classic false-failure, so they are parsed
//!   first.
//! - Byte-size directives use `g`/`m`/`k` suffixes (`"5M"`, `"16k"`) that
//!   must become absolute counts before any numeric comparison.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::probe::RuntimeProbe;

/// A literal directive expectation, typed so comparison can normalize the
/// raw runtime string appropriately.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveValue {
    Bool(bool),
    Bytes(u64),
    Text(String),
}

/// What a directive check expects: a literal value or a predicate over the
/// raw current value.
pub enum ExpectedValue {
    Literal(DirectiveValue),
    Predicate(Box<dyn Fn(&str) -> bool>),
}

impl ExpectedValue {
    pub fn flag(on: bool) -> Self {
        Self::Literal(DirectiveValue::Bool(on))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Literal(DirectiveValue::Text(value.into()))
    }

    pub fn bytes(count: u64) -> Self {
        Self::Literal(DirectiveValue::Bytes(count))
    }

    pub fn predicate(f: impl Fn(&str) -> bool + 'static) -> Self {
        Self::Predicate(Box::new(f))
    }
}

impl fmt::Debug for ExpectedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// The descriptor for one directive check.
#[derive(Debug)]
pub struct DirectiveCheck {
    pub name: String,
    pub expected: ExpectedValue,
    pub approximate: bool,
}

impl DirectiveCheck {
    pub fn new(name: impl Into<String>, expected: ExpectedValue, approximate: bool) -> Self {
        Self {
            name: name.into(),
            expected,
            approximate,
        }
    }
}

/// Evaluate a directive check against the runtime, once.
///
/// The current value is a snapshot read here; later runtime changes are
/// not reflected. A panicking predicate counts as unfulfilled rather than
/// aborting the whole evaluation run.
pub fn evaluate(check: &DirectiveCheck, probe: &dyn RuntimeProbe) -> bool {
    let current = probe.read_directive(&check.name);
    let unset = current.as_deref().is_none_or(str::is_empty);
    let raw = current.unwrap_or_default();

    let matched = match &check.expected {
        ExpectedValue::Literal(DirectiveValue::Bool(want)) => parse_bool(&raw) == *want,
        ExpectedValue::Literal(DirectiveValue::Bytes(want)) => parse_bytes(&raw) == Some(*want),
        ExpectedValue::Literal(DirectiveValue::Text(want)) => raw == *want,
        ExpectedValue::Predicate(f) => {
            catch_unwind(AssertUnwindSafe(|| f(&raw))).unwrap_or_else(|_| {
                tracing::warn!("Predicate for directive '{}' panicked", check.name);
                false
            })
        }
    };

    matched || (check.approximate && unset)
}

/// Normalize a boolean-like directive value.
///
/// `"1"`, `"on"`, `"true"`, `"yes"` are true (case-insensitive); anything
/// else, including the empty string, is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "on" | "true" | "yes"
    )
}

/// Parse a byte-size directive value into an absolute count.
///
/// `g`/`m`/`k` suffixes (case-insensitive) multiply by 1024^3 / 1024^2 /
/// 1024; a bare number is already the absolute count.
pub fn parse_bytes(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (digits, multiplier) = match trimmed.chars().last() {
        Some('g') | Some('G') => (&trimmed[..trimmed.len() - 1], 1024u64.pow(3)),
        Some('m') | Some('M') => (&trimmed[..trimmed.len() - 1], 1024u64.pow(2)),
        Some('k') | Some('K') => (&trimmed[..trimmed.len() - 1], 1024),
        _ => (trimmed, 1),
    };

    digits
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
}
