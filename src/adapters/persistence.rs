//! Seed Persistence
//!
//! JSON file implementation of `SeedStore`, so the base liquidity written by
//! an override survives into the next session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{SeedStore, SeedStoreError};

/// Default seed file name
pub const DEFAULT_SEED_FILE: &str = "seed.json";

/// On-disk seed record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSeed {
    pub base_liquidity: f64,
    pub updated_at: DateTime<Utc>,
}

/// Seed store backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileSeedStore {
    path: PathBuf,
}

impl FileSeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default file name inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(DEFAULT_SEED_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full record, `None` if the file is missing or empty
    pub async fn load_record(&self) -> Result<Option<PersistedSeed>, SeedStoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SeedStoreError::ReadError(e.to_string())),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let record: PersistedSeed = serde_json::from_str(&content)
            .map_err(|e| SeedStoreError::CorruptedFile(e.to_string()))?;

        if !record.base_liquidity.is_finite() || record.base_liquidity <= 0.0 {
            return Err(SeedStoreError::CorruptedFile(format!(
                "base_liquidity must be > 0, got {}",
                record.base_liquidity
            )));
        }

        Ok(Some(record))
    }
}

#[async_trait]
impl SeedStore for FileSeedStore {
    async fn load_base_liquidity(&self) -> Result<Option<f64>, SeedStoreError> {
        let record = self.load_record().await?;
        if let Some(ref r) = record {
            tracing::info!(
                "Seed loaded: base liquidity {:.2} (saved {})",
                r.base_liquidity,
                r.updated_at
            );
        }
        Ok(record.map(|r| r.base_liquidity))
    }

    async fn save_base_liquidity(&self, liquidity: f64) -> Result<(), SeedStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SeedStoreError::WriteError(e.to_string()))?;
            }
        }

        let record = PersistedSeed {
            base_liquidity: liquidity,
            updated_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&record)
            .map_err(|e| SeedStoreError::SerializationError(e.to_string()))?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| SeedStoreError::WriteError(e.to_string()))?;

        tracing::info!(
            "Seed saved: base liquidity {:.2} -> {}",
            liquidity,
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSeedStore::in_dir(dir.path());
        assert_eq!(store.load_base_liquidity().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = FileSeedStore::new(dir.path().join("nested/data/seed.json"));

        store.save_base_liquidity(39.29).await.unwrap();
        assert_eq!(store.load_base_liquidity().await.unwrap(), Some(39.29));

        let record = store.load_record().await.unwrap().unwrap();
        assert!(record.updated_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_empty_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "  \n").unwrap();

        let store = FileSeedStore::new(&path);
        assert_eq!(store.load_base_liquidity().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupted_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSeedStore::new(&path);
        assert!(matches!(
            store.load_base_liquidity().await,
            Err(SeedStoreError::CorruptedFile(_))
        ));
    }

    #[tokio::test]
    async fn test_non_positive_liquidity_is_corrupted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"{"base_liquidity": -3.0, "updated_at": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let store = FileSeedStore::new(&path);
        assert!(matches!(
            store.load_base_liquidity().await,
            Err(SeedStoreError::CorruptedFile(_))
        ));
    }
}
