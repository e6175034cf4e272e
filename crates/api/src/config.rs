//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the server starts with defaults and an empty
//! key set (every request is then rejected with 401).
//!
//! - `INKLEAF_HOST` - Bind address (default: 127.0.0.1)
//! - `INKLEAF_PORT` - Listen port (default: 3000)
//! - `INKLEAF_API_KEYS` - Comma-separated `token=user_id` pairs
//! - `INKLEAF_NOTIFY_DISPATCH` - `immediate` or `deferred` (default: immediate)
//! - `INKLEAF_NOTIFY_DELAY_SECS` - Delay for deferred dispatch (default: 5)
//! - `INKLEAF_LOCK_TIMEOUT_MS` - Per-attempt stock lock wait (default: 250)
//! - `INKLEAF_LOCK_ATTEMPTS` - Stock lock attempts before giving up (default: 4)
//! - `INKLEAF_DEMO_SEED` - Seed demo data on startup (default: false)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use inkleaf_core::UserId;
use inkleaf_orders::{LockConfig, NotificationMode, WorkflowConfig};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Bearer tokens and the users they authenticate as
    pub api_keys: Vec<ApiKey>,
    /// When order notifications are handed to the notifier
    pub notification: NotificationMode,
    /// Per-book stock lock policy
    pub lock: LockConfig,
    /// Whether to seed demo data on startup
    pub demo_seed: bool,
}

/// One configured bearer token.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiKey {
    /// The bearer token presented by clients
    pub token: SecretString,
    /// User the token authenticates as
    pub user_id: UserId,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("INKLEAF_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("INKLEAF_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("INKLEAF_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("INKLEAF_PORT".to_string(), e.to_string()))?;

        let api_keys = match get_optional_env("INKLEAF_API_KEYS") {
            Some(raw) => parse_api_keys(&raw)?,
            None => Vec::new(),
        };

        let delay_secs = get_env_or_default("INKLEAF_NOTIFY_DELAY_SECS", "5")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("INKLEAF_NOTIFY_DELAY_SECS".to_string(), e.to_string())
            })?;
        let notification = parse_dispatch(
            &get_env_or_default("INKLEAF_NOTIFY_DISPATCH", "immediate"),
            Duration::from_secs(delay_secs),
        )?;

        let lock = parse_lock_config()?;
        let demo_seed = parse_flag("INKLEAF_DEMO_SEED", &get_env_or_default("INKLEAF_DEMO_SEED", "false"))?;

        Ok(Self {
            host,
            port,
            api_keys,
            notification,
            lock,
            demo_seed,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Workflow configuration derived from this config.
    #[must_use]
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            notification: self.notification,
            lock: self.lock,
            ..WorkflowConfig::default()
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse `INKLEAF_API_KEYS`: comma-separated `token=user_id` pairs.
///
/// Empty entries (trailing commas, doubled commas) are skipped.
fn parse_api_keys(raw: &str) -> Result<Vec<ApiKey>, ConfigError> {
    let invalid = |detail: String| ConfigError::InvalidEnvVar("INKLEAF_API_KEYS".to_string(), detail);

    let mut keys = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        let (token, user_id) = entry
            .split_once('=')
            .ok_or_else(|| invalid(format!("entry '{entry}' is not of the form token=user_id")))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(invalid("entry has an empty token".to_string()));
        }

        let user_id = user_id
            .trim()
            .parse::<i32>()
            .map_err(|e| invalid(format!("user id in '{entry}': {e}")))?;

        keys.push(ApiKey {
            token: SecretString::from(token.to_string()),
            user_id: UserId::new(user_id),
        });
    }
    Ok(keys)
}

/// Parse `INKLEAF_NOTIFY_DISPATCH` into a notification mode.
fn parse_dispatch(mode: &str, delay: Duration) -> Result<NotificationMode, ConfigError> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "immediate" => Ok(NotificationMode::Immediate),
        "deferred" => Ok(NotificationMode::Deferred(delay)),
        other => Err(ConfigError::InvalidEnvVar(
            "INKLEAF_NOTIFY_DISPATCH".to_string(),
            format!("expected 'immediate' or 'deferred', got '{other}'"),
        )),
    }
}

/// Parse a boolean flag variable.
fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Assemble the stock lock policy from its two variables.
fn parse_lock_config() -> Result<LockConfig, ConfigError> {
    let timeout_ms = get_env_or_default("INKLEAF_LOCK_TIMEOUT_MS", "250")
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("INKLEAF_LOCK_TIMEOUT_MS".to_string(), e.to_string())
        })?;
    let max_attempts = get_env_or_default("INKLEAF_LOCK_ATTEMPTS", "4")
        .parse::<u32>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("INKLEAF_LOCK_ATTEMPTS".to_string(), e.to_string())
        })?;
    if max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "INKLEAF_LOCK_ATTEMPTS".to_string(),
            "must be at least 1".to_string(),
        ));
    }

    Ok(LockConfig {
        acquire_timeout: Duration::from_millis(timeout_ms),
        max_attempts,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_keys_two_entries() {
        let keys = parse_api_keys("alpha-token=1, beta-token=2").unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].user_id, UserId::new(1));
        assert_eq!(keys[1].user_id, UserId::new(2));
    }

    #[test]
    fn test_parse_api_keys_skips_empty_entries() {
        let keys = parse_api_keys("alpha-token=1,,").unwrap();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_parse_api_keys_empty_string() {
        let keys = parse_api_keys("").unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_parse_api_keys_missing_separator() {
        let result = parse_api_keys("alpha-token");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_api_keys_bad_user_id() {
        let result = parse_api_keys("alpha-token=abc");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_api_keys_empty_token() {
        let result = parse_api_keys("=1");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_dispatch_immediate() {
        let mode = parse_dispatch("immediate", Duration::from_secs(5)).unwrap();
        assert_eq!(mode, NotificationMode::Immediate);
    }

    #[test]
    fn test_parse_dispatch_deferred_carries_delay() {
        let mode = parse_dispatch("Deferred", Duration::from_secs(7)).unwrap();
        assert_eq!(mode, NotificationMode::Deferred(Duration::from_secs(7)));
    }

    #[test]
    fn test_parse_dispatch_unknown() {
        let result = parse_dispatch("sometimes", Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "1").unwrap());
        assert!(parse_flag("X", "TRUE").unwrap());
        assert!(!parse_flag("X", "false").unwrap());
        assert!(!parse_flag("X", "").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            api_keys: Vec::new(),
            notification: NotificationMode::Immediate,
            lock: LockConfig::default(),
            demo_seed: false,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_workflow_config_carries_dispatch_and_lock() {
        let lock = LockConfig {
            acquire_timeout: Duration::from_millis(10),
            max_attempts: 2,
        };
        let config = ApiConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            api_keys: Vec::new(),
            notification: NotificationMode::Deferred(Duration::from_secs(5)),
            lock,
            demo_seed: false,
        };

        let workflow = config.workflow_config();
        assert_eq!(
            workflow.notification,
            NotificationMode::Deferred(Duration::from_secs(5))
        );
        assert_eq!(workflow.lock, lock);
    }

    #[test]
    fn test_api_key_debug_redacts_token() {
        let key = ApiKey {
            token: SecretString::from("super_secret_token"),
            user_id: UserId::new(1),
        };

        let debug_output = format!("{key:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
