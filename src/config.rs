use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable that overrides `general.database_path`.
pub const DATABASE_URL_ENV: &str = "SGP_DATABASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub security: SecurityConfig,

    pub auth: AuthConfig,

    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/sgp.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of an issued access token
    pub token_ttl_hours: u32,

    pub min_password_length: usize,

    /// Oldest tokens are dropped on login once a user holds this many
    pub max_tokens_per_user: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: crate::constants::auth::TOKEN_TTL_HOURS,
            min_password_length: crate::constants::auth::MIN_PASSWORD_LENGTH,
            max_tokens_per_user: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed reference data when the application starts
    pub run_on_startup: bool,

    /// Full IBGE municipality export (JSON array of `{ibge, uf, nome}`).
    /// When unset, the dataset bundled with the binary is used.
    pub cidades_path: Option<PathBuf>,

    pub insert_chunk_size: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            run_on_startup: true,
            cidades_path: None,
            insert_chunk_size: 500,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = None;
        for path in Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Some(Self::load_from_path(&path)?);
                break;
            }
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Self::default()
        });

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            config.general.database_path = url;
        }

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = PathBuf::from("config.toml");
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            Ok(true)
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("sgp").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".sgp").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.trim().is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!(
                "min_db_connections ({}) cannot exceed max_db_connections ({})",
                self.general.min_db_connections,
                self.general.max_db_connections
            );
        }

        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "Unknown log_format '{}' (expected \"pretty\" or \"json\")",
                self.general.log_format
            );
        }

        if self.auth.token_ttl_hours == 0 {
            anyhow::bail!("Token TTL must be at least one hour");
        }

        if self.auth.max_tokens_per_user == 0 {
            anyhow::bail!("max_tokens_per_user must be at least 1");
        }

        if self.seed.insert_chunk_size == 0 {
            anyhow::bail!("Seed insert chunk size must be > 0");
        }

        argon2::Params::new(
            self.security.argon2_memory_cost_kib,
            self.security.argon2_time_cost,
            self.security.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.database_path, "sqlite:data/sgp.db");
        assert_eq!(config.auth.token_ttl_hours, 8);
        assert!(config.seed.run_on_startup);
        assert!(config.seed.cidades_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(toml_str.contains("[auth]"));
        assert!(toml_str.contains("[seed]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [auth]
            token_ttl_hours = 24

            [seed]
            cidades_path = "/srv/ibge/municipios.json"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(
            config.seed.cidades_path.as_deref(),
            Some(Path::new("/srv/ibge/municipios.json"))
        );

        assert_eq!(config.general.max_db_connections, 5);
        assert_eq!(config.seed.insert_chunk_size, 500);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.auth.token_ttl_hours = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.min_db_connections = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.log_format = "xml".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.seed.insert_chunk_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.security.argon2_time_cost = 0;
        assert!(config.validate().is_err());
    }
}
