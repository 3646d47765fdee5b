// SPDX-License-Identifier: MIT

//! Environment configuration
//!
//! | variable                | default  |
//! |-------------------------|----------|
//! | `REDIS_IF_PORT`         | `7379`   |
//! | `REDIS_IF_COMPARE_MODE` | `coerce` |
//! | `REDIS_IF_SEED`         | unset    |

use std::path::PathBuf;

use crate::error::HostError;
use crate::txn::{CompareMode, RunOptions};

pub const DEFAULT_PORT: u16 = 7379;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub mode: CompareMode,
    /// Seed file applied to the store at startup
    pub seed: Option<PathBuf>,
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HostError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("REDIS_IF_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                HostError::config(format!("REDIS_IF_PORT must be a port number, got {:?}", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let mode = match lookup("REDIS_IF_COMPARE_MODE") {
            Some(raw) => raw.trim().parse::<CompareMode>().map_err(HostError::config)?,
            None => CompareMode::default(),
        };

        let seed = lookup("REDIS_IF_SEED")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { port, mode, seed })
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions::with_mode(self.mode)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            mode: CompareMode::default(),
            seed: None,
        }
    }
}
