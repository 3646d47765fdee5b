// SPDX-License-Identifier: MIT

//! Typed error handling for transaction evaluation
//!
//! Two layers: `StoreError` is what a command invoker reports when the store
//! rejects an operation, `TxnError` is what the runner surfaces to callers.

use thiserror::Error;

/// Top-level error type for a transaction request
#[derive(Debug, Error)]
pub enum TxnError {
    /// A condition used an operator outside `==`, `!=`, `>`, `<`
    #[error("invalid operator \"{0}\"")]
    InvalidOperator(String),

    /// The store rejected one of the invoked commands
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request does not have the `{if, exec}` shape
    #[error("malformed request: {0}")]
    Request(String),

    /// The request payload is not valid JSON
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Store-level errors, worded after the Redis replies they stand in for
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR value is not an integer or out of range")]
    NotInteger,
}

impl TxnError {
    /// Create an invalid operator error
    pub fn invalid_operator(token: impl Into<String>) -> Self {
        Self::InvalidOperator(token.into())
    }

    /// Create a malformed request error
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    /// True when the caller sent something the evaluator cannot accept,
    /// as opposed to the store refusing a command.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
