// SPDX-License-Identifier: MIT

use std::sync::Arc;
use tokio::sync::Mutex;

use super::memory::MemoryStore;
use crate::txn::{self, Outcome, Request, RunOptions, TxnError, Value};

/// A store shared between concurrent callers.
///
/// Each transaction runs while holding the lock, so no other caller's
/// command can land between its first condition and its last exec command.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store
    pub async fn atomically<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut MemoryStore) -> R,
    {
        let mut store = self.inner.lock().await;
        f(&mut store)
    }

    /// Run a transaction inside the atomic context
    pub async fn transaction(
        &self,
        request: &Request,
        options: RunOptions,
    ) -> Result<Outcome, TxnError> {
        self.atomically(|store| txn::run(request, store, options))
            .await
    }

    /// Read the current value of a key
    pub async fn value(&self, key: &str) -> Value {
        self.atomically(|store| store.value(key)).await
    }

    pub async fn snapshot(&self) -> serde_json::Value {
        self.atomically(|store| store.to_json()).await
    }
}
