// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## When to Use
//
// - Testing environments
// - Dry runs where persistence is deliberately disabled
//
// All state is lost when the process exits, so the next invocation behaves
// like a first run.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::{ObservedState, StateStore};

/// In-memory state store implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<Option<ObservedState>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with prior state
    pub fn with_state(state: ObservedState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(state))),
        }
    }

    /// Drop any stored state
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn read(&self) -> Result<Option<ObservedState>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn write(&self, state: &ObservedState) -> Result<(), Error> {
        *self.inner.write().await = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn starts_empty_and_holds_last_write() {
        let store = MemoryStateStore::new();
        assert_eq!(store.read().await.unwrap(), None);

        let first = ObservedState::now(Ipv4Addr::new(192, 168, 0, 2));
        store.write(&first).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(first));

        let second = ObservedState::now(Ipv4Addr::new(192, 168, 0, 3));
        store.write(&second).await.unwrap();
        assert_eq!(store.read().await.unwrap(), Some(second));

        store.clear().await;
        assert_eq!(store.read().await.unwrap(), None);
    }
}
