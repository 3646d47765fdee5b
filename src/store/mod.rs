// SPDX-License-Identifier: MIT

//! Store host
//!
//! This module provides:
//! - `MemoryStore` - an in-memory keyspace that executes commands
//! - `SharedStore` - a lock around it that supplies the atomic context
//! - `SeedLoader` - initial keyspace contents from YAML or JSON

mod memory;
mod seed;
mod shared;

pub use memory::{Entry, MemoryStore};
pub use seed::{Seed, SeedLoader, SeedValue};
pub use shared::SharedStore;
