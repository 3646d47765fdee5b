// SPDX-License-Identifier: MIT

//! Comparison operators

use std::cmp::Ordering;
use std::str::FromStr;

use crate::txn::error::TxnError;
use crate::txn::value::{CompareMode, Value};

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// ==
    Eq,
    /// !=
    NotEq,
    /// >
    Gt,
    /// <
    Lt,
}

impl Operator {
    /// Resolve the operator of a condition; the two-element form means `==`
    pub fn resolve(token: Option<&str>) -> Result<Self, TxnError> {
        token.map_or(Ok(Operator::Eq), |t| t.parse())
    }

    /// Apply `expected <op> actual`
    pub fn apply(self, expected: &Value, actual: &Value, mode: CompareMode) -> bool {
        let ordering = expected.compare(actual, mode);
        match self {
            Operator::Eq => ordering == Some(Ordering::Equal),
            Operator::NotEq => ordering != Some(Ordering::Equal),
            Operator::Gt => ordering == Some(Ordering::Greater),
            Operator::Lt => ordering == Some(Ordering::Less),
        }
    }
}

impl FromStr for Operator {
    type Err = TxnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Operator::Eq),
            "!=" => Ok(Operator::NotEq),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            other => Err(TxnError::invalid_operator(other)),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Eq => write!(f, "=="),
            Operator::NotEq => write!(f, "!="),
            Operator::Gt => write!(f, ">"),
            Operator::Lt => write!(f, "<"),
        }
    }
}
