// SPDX-License-Identifier: MIT

//! Conditional atomic transactions
//!
//! This module provides:
//! - `Request` - the `{if, exec}` document submitted once per transaction
//! - `CommandInvoker` - the store capability every command goes through
//! - `run` - evaluate the conditions, then execute the commands if they all hold

pub mod condition;
pub mod error;
pub mod invoker;
pub mod request;
pub mod runner;
pub mod value;

pub use error::{StoreError, TxnError};
pub use invoker::CommandInvoker;
pub use request::{Command, Condition, Request};
pub use runner::{run, run_json, Outcome, RunOptions};
pub use value::{Arg, CompareMode, Value};
