use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_MAX_PAGE_LIMIT, DEFAULT_PORT,
    SQLITE_MAX_CONNECTIONS,
};
use super::storage::AppStorage;
use crate::data::filters::DEFAULT_LIMIT;

// =============================================================================
// File Config Structs (parsed from JSON)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// SQLite file path (`~` is expanded)
    pub path: Option<String>,
    pub max_connections: Option<u32>,
}

/// Pagination configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaginationFileConfig {
    pub default_limit: Option<u32>,
    pub max_limit: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub pagination: Option<PaginationFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.path.is_some() {
                tracing::trace!(path = ?database.path, "Merging database.path");
                current.path = database.path;
            }
            if database.max_connections.is_some() {
                tracing::trace!(
                    max_connections = ?database.max_connections,
                    "Merging database.max_connections"
                );
                current.max_connections = database.max_connections;
            }
        }

        if let Some(pagination) = other.pagination {
            let current = self
                .pagination
                .get_or_insert_with(PaginationFileConfig::default);
            if pagination.default_limit.is_some() {
                tracing::trace!(
                    default_limit = ?pagination.default_limit,
                    "Merging pagination.default_limit"
                );
                current.default_limit = pagination.default_limit;
            }
            if pagination.max_limit.is_some() {
                tracing::trace!(max_limit = ?pagination.max_limit, "Merging pagination.max_limit");
                current.max_limit = pagination.max_limit;
            }
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
}

/// Pagination configuration (final/runtime)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.recipebox/recipebox.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::from_layers(cli, file_config);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            db_path = %config.database.path.display(),
            max_connections = config.database.max_connections,
            default_limit = config.pagination.default_limit,
            max_limit = config.pagination.max_limit,
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Layer configs: defaults -> file config -> CLI/env overrides
    fn from_layers(cli: &CliConfig, file_config: FileConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_pagination = file_config.pagination.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let path = cli
            .db_path
            .as_ref()
            .map(|p| expand_path(&p.to_string_lossy()))
            .or_else(|| file_database.path.as_deref().map(expand_path))
            .unwrap_or_else(default_database_path);

        let max_connections = file_database
            .max_connections
            .unwrap_or(SQLITE_MAX_CONNECTIONS);

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_limit: file_pagination
                .default_limit
                .unwrap_or(defaults.default_limit),
            max_limit: cli
                .max_page_limit
                .or(file_pagination.max_limit)
                .unwrap_or(defaults.max_limit),
        };

        Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                path,
                max_connections,
            },
            pagination,
        }
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port 0 would bind a random port
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }

        if self.pagination.max_limit == 0 {
            anyhow::bail!("Configuration error: pagination.max_limit must be greater than 0");
        }

        if self.pagination.default_limit == 0 {
            anyhow::bail!("Configuration error: pagination.default_limit must be greater than 0");
        }

        if self.pagination.default_limit > self.pagination.max_limit {
            tracing::warn!(
                default_limit = self.pagination.default_limit,
                max_limit = self.pagination.max_limit,
                "pagination.default_limit exceeds max_limit; pages are capped at max_limit"
            );
        }

        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Binding to all network interfaces; the API has no authentication"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.recipebox/recipebox.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// `<data_dir>/sqlite/recipebox.db`
fn default_database_path() -> PathBuf {
    AppStorage::resolve().database_path()
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
