// SPDX-License-Identifier: MIT

//! Conditional atomic transactions for a key-value store.
//!
//! A request lists conditions and commands; the commands run only when
//! every condition holds against live store state, and the whole request
//! executes without interleaving from other callers.

pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod txn;
