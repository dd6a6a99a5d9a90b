use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::{GeneralConfig, SeedConfig};

pub mod migrator;
pub mod repositories;
pub mod seed;
pub mod unit_of_work;

pub use repositories::{CidadeRepository, EstadoRepository, RegiaoRepository, UsuarioRepository};
pub use unit_of_work::{PendingChange, UnitOfWork, UnitOfWorkError};

/// Owns the connection pool. Repositories and units of work are built from it on demand.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn from_config(general: &GeneralConfig) -> Result<Self> {
        Self::with_pool_options(
            &general.database_path,
            general.max_db_connections,
            general.min_db_connections,
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to {db_url}"))?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    #[must_use]
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.conn.clone())
    }

    #[must_use]
    pub fn usuarios(&self) -> UsuarioRepository {
        UsuarioRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn cidades(&self) -> CidadeRepository {
        CidadeRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn estados(&self) -> EstadoRepository {
        EstadoRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn regioes(&self) -> RegiaoRepository {
        RegiaoRepository::new(self.conn.clone())
    }

    pub async fn ensure_seed_data(&self, config: &SeedConfig) -> Result<u64> {
        seed::ensure_seed_data(&self.conn, config).await
    }
}
