//! Seed store port
//!
//! Persists the base liquidity a session is seeded from. A forced override
//! writes a new base so the next session starts from it.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug, Clone)]
pub enum SeedStoreError {
    #[error("Failed to read seed file: {0}")]
    ReadError(String),

    #[error("Failed to write seed file: {0}")]
    WriteError(String),

    #[error("Failed to serialize seed: {0}")]
    SerializationError(String),

    #[error("Seed file is corrupted: {0}")]
    CorruptedFile(String),
}

/// Storage for the persisted base liquidity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Load the persisted base liquidity, `None` if nothing was saved yet
    async fn load_base_liquidity(&self) -> Result<Option<f64>, SeedStoreError>;

    /// Persist a new base liquidity
    async fn save_base_liquidity(&self, liquidity: f64) -> Result<(), SeedStoreError>;
}

/// Process-local store, shared between clones
#[derive(Debug, Clone, Default)]
pub struct InMemorySeedStore {
    value: Arc<Mutex<Option<f64>>>,
}

impl InMemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(liquidity: f64) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(liquidity))),
        }
    }
}

#[async_trait]
impl SeedStore for InMemorySeedStore {
    async fn load_base_liquidity(&self) -> Result<Option<f64>, SeedStoreError> {
        Ok(*self.value.lock().await)
    }

    async fn save_base_liquidity(&self, liquidity: f64) -> Result<(), SeedStoreError> {
        *self.value.lock().await = Some(liquidity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let store = InMemorySeedStore::new();
        assert_eq!(store.load_base_liquidity().await.unwrap(), None);

        let shared = store.clone();
        shared.save_base_liquidity(39.29).await.unwrap();
        assert_eq!(store.load_base_liquidity().await.unwrap(), Some(39.29));
    }

    #[tokio::test]
    async fn test_with_value() {
        let store = InMemorySeedStore::with_value(5000.0);
        assert_eq!(store.load_base_liquidity().await.unwrap(), Some(5000.0));
    }
}
