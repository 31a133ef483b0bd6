//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use crate::config::{AppConfig, ClientSettings, LoggingConfig};
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use nrc_domain::error::{Error, Result};
use nrc_domain::value_objects::{ServerEndpoint, ServiceName};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `NRC_RETRY__ENABLED`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // Double underscore separates nested keys so single underscores stay
        // part of the field name (NRC_CLIENT_DEFAULTS__READ_TIMEOUT_MS)
        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string = to_toml(config)?;
        std::fs::write(path.as_ref(), toml_string)
            .with_context(|| format!("Failed to write config file {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME))
                .unwrap_or_default(),
        ];

        candidates
            .into_iter()
            .find(|path| !path.as_os_str().is_empty() && path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Render configuration as pretty TOML
pub fn to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(&config.logging)?;
    validate_client_defaults(config)?;
    for (name, settings) in &config.clients {
        validate_client_settings(name, settings)?;
    }
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

fn validate_client_defaults(config: &AppConfig) -> Result<()> {
    let defaults = &config.client_defaults;
    if defaults.connect_timeout_ms == 0 {
        return Err(Error::configuration("Connect timeout cannot be 0"));
    }
    if defaults.read_timeout_ms == 0 {
        return Err(Error::configuration("Read timeout cannot be 0"));
    }
    if defaults.secure_ports.contains(&0) {
        return Err(Error::configuration("Secure port cannot be 0"));
    }
    Ok(())
}

fn validate_client_settings(name: &str, settings: &ClientSettings) -> Result<()> {
    ServiceName::new(name)
        .map_err(|_| Error::configuration("Client configuration key cannot be blank"))?;
    if settings.connect_timeout_ms == Some(0) {
        return Err(Error::configuration(format!(
            "Connect timeout for client '{name}' cannot be 0"
        )));
    }
    if settings.read_timeout_ms == Some(0) {
        return Err(Error::configuration(format!(
            "Read timeout for client '{name}' cannot be 0"
        )));
    }
    for server in &settings.servers {
        server.parse::<ServerEndpoint>().map_err(|e| {
            Error::configuration(format!("Invalid server for client '{name}': {e}"))
        })?;
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Add a client with a static server list
    pub fn with_client<I, S>(mut self, name: &str, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .clients
            .insert(name.to_string(), ClientSettings::with_servers(servers));
        self
    }

    /// Add a client with full settings
    pub fn with_client_settings(mut self, name: &str, settings: ClientSettings) -> Self {
        self.config.clients.insert(name.to_string(), settings);
        self
    }

    /// Add a placeholder property
    pub fn with_property<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.config.properties.insert(key.into(), value.into());
        self
    }

    /// Enable or disable retries for load-balanced calls
    pub fn with_retry(mut self, enabled: bool) -> Self {
        self.config.retry.enabled = enabled;
        self
    }

    /// Adjust the shared client defaults
    pub fn with_client_defaults<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut crate::config::ClientDefaults),
    {
        f(&mut self.config.client_defaults);
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
