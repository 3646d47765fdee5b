// SPDX-License-Identifier: MIT

//! Tagged values exchanged with the store
//!
//! Replies and condition literals share one type so that comparison is a
//! single total function over every pairing of `Number`, `Text`, `Nil` and
//! `Set`, rather than an implicit coercion scattered across call sites.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A reply from the store, or a literal a reply is compared against
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Exact JSON number: integers keep every digit, floats stay floats
    Number(Number),
    Text(String),
    /// Absent key / nil bulk reply
    Nil,
    Set(BTreeSet<String>),
}

/// Rule applied when a comparison mixes numbers and text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Numeric when both sides read as numbers, byte-wise on text otherwise
    #[default]
    Coerce,
    /// Numbers only compare with numbers, text only with text
    Strict,
}

/// A positional command argument
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Arg {
    Text(String),
    Number(Number),
}

/// Numeric reading of a value, integers kept exact
#[derive(Debug, Clone, Copy, PartialEq)]
enum Numeric {
    Int(i128),
    Float(f64),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn set<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Set(members.into_iter().map(Into::into).collect())
    }

    /// Build a condition literal from its JSON form.
    ///
    /// `null` is the explicit "missing" literal and an array of strings
    /// stands for a set reply.
    pub fn from_literal(json: &serde_json::Value) -> Result<Self, String> {
        match json {
            serde_json::Value::Null => Ok(Value::Nil),
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Number(n) => Ok(Value::Number(n.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => Ok(s.clone()),
                    other => Err(format!("set literal members must be strings, got {}", other)),
                })
                .collect::<Result<BTreeSet<_>, _>>()
                .map(Value::Set),
            other => Err(format!("unsupported literal: {}", other)),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Nil => serde_json::Value::Null,
            Value::Set(members) => serde_json::Value::Array(
                members
                    .iter()
                    .map(|m| serde_json::Value::String(m.clone()))
                    .collect(),
            ),
        }
    }

    /// Numeric reading of the value, if it has one
    fn numeric(&self, mode: CompareMode) -> Option<Numeric> {
        match (self, mode) {
            (Value::Number(n), _) => Numeric::from_number(n),
            (Value::Text(s), CompareMode::Coerce) => parse_number(s),
            _ => None,
        }
    }

    /// Text reading of the value; numbers render in canonical form
    fn textual(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(format_number(n))),
            _ => None,
        }
    }

    /// Compare two values.
    ///
    /// Returns `None` for pairs with no defined relation: nil against
    /// anything but nil, sets against anything but an equal set, and in
    /// strict mode any number/text mix. `Some(Equal)` is the only outcome
    /// that makes `==` hold.
    pub fn compare(&self, other: &Value, mode: CompareMode) -> Option<Ordering> {
        match (self, other) {
            (Value::Nil, Value::Nil) => Some(Ordering::Equal),
            (Value::Nil, _) | (_, Value::Nil) => None,
            (Value::Set(a), Value::Set(b)) => (a == b).then_some(Ordering::Equal),
            (Value::Set(_), _) | (_, Value::Set(_)) => None,
            _ => {
                if let (Some(a), Some(b)) = (self.numeric(mode), other.numeric(mode)) {
                    return a.compare(b);
                }
                match mode {
                    CompareMode::Strict => match (self, other) {
                        (Value::Text(a), Value::Text(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
                        _ => None,
                    },
                    CompareMode::Coerce => {
                        let a = self.textual()?;
                        let b = other.textual()?;
                        Some(a.as_bytes().cmp(b.as_bytes()))
                    }
                }
            }
        }
    }

    pub fn equals(&self, other: &Value, mode: CompareMode) -> bool {
        self.compare(other, mode) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(n)),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Nil => write!(f, "(nil)"),
            Value::Set(members) => write!(f, "{:?}", members),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coerce" => Ok(CompareMode::Coerce),
            "strict" => Ok(CompareMode::Strict),
            other => Err(format!("unknown compare mode: {}", other)),
        }
    }
}

impl Arg {
    pub fn from_json(json: &serde_json::Value) -> Result<Self, String> {
        match json {
            serde_json::Value::String(s) => Ok(Arg::Text(s.clone())),
            serde_json::Value::Number(n) => Ok(Arg::Number(n.clone())),
            other => Err(format!("arguments must be strings or numbers, got {}", other)),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(s) => f.write_str(s),
            Arg::Number(n) => f.write_str(&format_number(n)),
        }
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Number(Number::from(n))
    }
}

impl Numeric {
    fn from_number(n: &Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            Some(Numeric::Int(i128::from(i)))
        } else if let Some(u) = n.as_u64() {
            Some(Numeric::Int(i128::from(u)))
        } else {
            n.as_f64().filter(|f| f.is_finite()).map(Numeric::Float)
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    /// Integers compare exactly; anything involving a float goes through f64
    fn compare(self, other: Numeric) -> Option<Ordering> {
        match (self, other) {
            (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

/// Parse text as a number the way a numeric-looking reply is read
fn parse_number(s: &str) -> Option<Numeric> {
    if let Ok(i) = s.parse::<i128>() {
        return Some(Numeric::Int(i));
    }
    s.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Numeric::Float)
}

/// Render a number the way the store prints it: integers without a fraction
pub fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}
