//! Configuration loader with layered sources.

use crate::{AppConfig, StoreBackendKind};
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use tagsweep_core::TagsweepError;
use tracing::{debug, info, warn};

/// Environment used when neither environment variable is set.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Loaded and validated application configuration.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `TAGSWEEP_` prefix, `__` between levels
    ///
    /// The environment comes from `TAGSWEEP_APP__ENVIRONMENT`, then
    /// `TAGSWEEP_ENVIRONMENT`, then `development`. The same value picks the
    /// environment file and becomes `app.environment`; files cannot set it.
    pub fn new(config_dir: impl AsRef<str>) -> Result<Self, TagsweepError> {
        let config = Self::load_config(config_dir.as_ref())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, TagsweepError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, TagsweepError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = resolve_environment();

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        // 1. Default configuration
        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Environment-specific configuration
        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Environment variables, e.g. TAGSWEEP_SECURITY__WEBHOOK_SECRET.
        // Values stay strings so secrets like "007" keep their leading zeros.
        builder = builder.add_source(
            Environment::with_prefix("TAGSWEEP")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder
            .set_override("app.environment", environment)
            .and_then(|builder| builder.build())
            .map_err(config_error_to_tagsweep_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_tagsweep_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

fn resolve_environment() -> String {
    std::env::var("TAGSWEEP_APP__ENVIRONMENT")
        .or_else(|_| std::env::var("TAGSWEEP_ENVIRONMENT"))
        .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

/// Validates a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), TagsweepError> {
    if config.security.webhook_secret.is_empty() {
        if config.app.is_development() {
            warn!("No webhook secret configured; every webhook request will be rejected");
        } else {
            return Err(TagsweepError::Configuration(
                "security.webhook_secret is required outside development".to_string(),
            ));
        }
    }

    if config.security.secret_header.trim().is_empty() {
        return Err(TagsweepError::Configuration(
            "security.secret_header must not be empty".to_string(),
        ));
    }

    if config.store.backend == StoreBackendKind::Redis && config.redis.url.is_empty() {
        return Err(TagsweepError::Configuration("Redis URL is required".to_string()));
    }

    if config.store.operation_timeout_ms == 0 {
        return Err(TagsweepError::Configuration(
            "store.operation_timeout_ms must be greater than zero".to_string(),
        ));
    }

    if config.indexer.queue_capacity == 0 {
        return Err(TagsweepError::Configuration(
            "indexer.queue_capacity must be greater than zero".to_string(),
        ));
    }

    if config.store.allow_flush && !config.app.is_development() {
        warn!("Admin flush endpoint is enabled outside development");
    }

    Ok(())
}

fn config_error_to_tagsweep_error(err: ConfigError) -> TagsweepError {
    TagsweepError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServerConfig;
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use std::time::Duration;

    /// Serializes tests that read or write `TAGSWEEP_*` variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets environment variables for one test and removes them on drop.
    struct EnvVars {
        keys: Vec<&'static str>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvVars {
        fn set(vars: &[(&'static str, &str)]) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            for key in ["TAGSWEEP_ENVIRONMENT", "TAGSWEEP_APP__ENVIRONMENT"] {
                std::env::remove_var(key);
            }
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
            Self {
                keys: vars.iter().map(|(key, _)| *key).collect(),
                _lock: lock,
            }
        }
    }

    impl Drop for EnvVars {
        fn drop(&mut self) {
            for key in &self.keys {
                std::env::remove_var(key);
            }
        }
    }

    fn config_dir(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            std::fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    fn load(dir: &tempfile::TempDir) -> Result<AppConfig, TagsweepError> {
        ConfigLoader::new(dir.path().to_string_lossy()).map(ConfigLoader::into_config)
    }

    const DEFAULT_TOML: &str = r#"
[server]
port = 9100

[store]
backend = "redis"
key_prefix = "edge"

[security]
webhook_secret = "s3cret"
"#;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.backend, StoreBackendKind::Redis);
        assert_eq!(config.store.operation_timeout(), Duration::from_millis(2000));
        assert_eq!(config.indexer.queue_capacity, 1024);
        assert_eq!(config.security.secret_header, "x-tagsweep-secret");
        assert!(config.downstream.purge_url.is_none());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_from_directory() {
        let _env = EnvVars::set(&[]);
        let dir = config_dir(&[("default.toml", DEFAULT_TOML)]);

        let config = load(&dir).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.backend, StoreBackendKind::Redis);
        assert_eq!(config.store.key_prefix, "edge");
        assert_eq!(config.security.webhook_secret, "s3cret");
        assert_eq!(config.app.environment, DEFAULT_ENVIRONMENT);
    }

    #[test]
    fn test_env_vars_override_files() {
        let _env = EnvVars::set(&[
            ("TAGSWEEP_SECURITY__WEBHOOK_SECRET", "007"),
            ("TAGSWEEP_STORE__BACKEND", "memory"),
            ("TAGSWEEP_SERVER__PORT", "9200"),
            ("TAGSWEEP_STORE__ALLOW_FLUSH", "true"),
        ]);
        let dir = config_dir(&[("default.toml", DEFAULT_TOML)]);

        let config = load(&dir).unwrap();

        assert_eq!(config.security.webhook_secret, "007");
        assert_eq!(config.store.backend, StoreBackendKind::Memory);
        assert_eq!(config.server.port, 9200);
        assert!(config.store.allow_flush);
        assert_eq!(config.store.key_prefix, "edge");
    }

    #[test]
    fn test_numeric_secret_stays_a_string() {
        let _env = EnvVars::set(&[("TAGSWEEP_SECURITY__WEBHOOK_SECRET", "12345")]);
        let dir = config_dir(&[("default.toml", DEFAULT_TOML)]);

        let config = load(&dir).unwrap();

        assert_eq!(config.security.webhook_secret, "12345");
    }

    #[test]
    fn test_app_environment_var_selects_environment_file() {
        let _env = EnvVars::set(&[("TAGSWEEP_APP__ENVIRONMENT", "staging")]);
        let dir = config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("staging.toml", "[server]\nport = 9300\n"),
        ]);

        let config = load(&dir).unwrap();

        assert_eq!(config.app.environment, "staging");
        assert_eq!(config.server.port, 9300);
    }

    #[test]
    fn test_legacy_environment_var_selects_environment_file() {
        let _env = EnvVars::set(&[("TAGSWEEP_ENVIRONMENT", "staging")]);
        let dir = config_dir(&[
            ("default.toml", DEFAULT_TOML),
            ("staging.toml", "[server]\nport = 9300\n"),
        ]);

        let config = load(&dir).unwrap();

        assert_eq!(config.app.environment, "staging");
        assert_eq!(config.server.port, 9300);
    }

    #[test]
    fn test_files_cannot_change_environment() {
        let _env = EnvVars::set(&[]);
        let dir = config_dir(&[("default.toml", "[app]\nenvironment = \"production\"\n")]);

        let config = load(&dir).unwrap();

        assert_eq!(config.app.environment, DEFAULT_ENVIRONMENT);
    }

    #[test]
    fn test_missing_secret_rejected_outside_development() {
        let mut config = AppConfig::default();
        config.app.environment = "production".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(TagsweepError::Configuration(_))
        ));

        config.security.webhook_secret = "s3cret".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_secret_allowed_in_development() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let mut config = AppConfig::default();
        config.indexer.queue_capacity = 0;
        assert!(validate_config(&config).is_err());
    }
}
