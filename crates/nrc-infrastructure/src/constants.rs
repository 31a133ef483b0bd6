//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Contract-level names are defined in `nrc_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "nrc.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "nrc";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "NRC";

/// Separator for nested keys in environment variables (`NRC_RETRY__ENABLED`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_FILTER_VAR: &str = "NRC_LOG";

/// File name prefix for rolling log files
pub const LOG_FILE_PREFIX: &str = "nrc";

// ============================================================================
// CLIENT DEFAULTS
// ============================================================================

/// Connection timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1000;

/// Read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Retries against the same server
pub const DEFAULT_MAX_AUTO_RETRIES: u32 = 0;

/// Retries against the next server
pub const DEFAULT_MAX_AUTO_RETRIES_NEXT_SERVER: u32 = 1;

/// Pause between retries in milliseconds
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 0;

/// Ports treated as TLS endpoints
pub const DEFAULT_SECURE_PORTS: [u16; 2] = [443, 8443];

// ============================================================================
// BUNDLE NAMES
// ============================================================================

/// Bundle holding the process-wide root capabilities
pub const ROOT_BUNDLE_NAME: &str = "root";

/// Default bundle applied first in every client scope
pub const CLIENT_BUNDLE_NAME: &str = "client-defaults";
