//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use sgp::config::{GeneralConfig, SeedConfig};
use sgp::db::Store;

/// Store backed by its own SQLite file; the file is removed on drop.
pub struct TestDb {
    pub store: Store,
    path: PathBuf,
}

impl TestDb {
    pub async fn open(name: &str) -> Self {
        Self::from_config(name, &mut GeneralConfig::default()).await
    }

    /// Points `general.database_path` at a fresh file before connecting.
    pub async fn from_config(name: &str, general: &mut GeneralConfig) -> Self {
        let path = std::env::temp_dir().join(format!("sgp-{name}-{}.db", uuid::Uuid::new_v4()));
        general.database_path = format!("sqlite:{}", path.display());

        let store = Store::from_config(general)
            .await
            .expect("Failed to open store");

        Self { store, path }
    }

    pub async fn seeded(name: &str, config: &SeedConfig) -> Self {
        let db = Self::open(name).await;
        db.store
            .ensure_seed_data(config)
            .await
            .expect("Failed to seed reference data");
        db
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}
