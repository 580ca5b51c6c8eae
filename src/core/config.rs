//! Configuration management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::core::errors::{GengoError, Result};

/// Production API endpoint
pub const API_URL: &str = "http://api.mygengo.com/v1/";

/// Sandbox API endpoint
pub const SANDBOX_API_URL: &str = "http://api.sandbox.mygengo.com/v1/";

/// Ini section holding the client settings
const INI_SECTION: &str = "config";

/// Configuration for the myGengo client
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Public key, sent with every request
    pub api_key: String,
    /// Key the requests are signed with; never sent
    pub private_key: String,
    /// Talk to the sandbox instead of the production API
    pub sandbox: bool,
    /// Overrides the endpoint picked by `sandbox`
    pub api_url: Option<String>,
    /// Timeout for ordinary calls
    pub timeout_ms: u64,
    /// Timeout for a single job submission
    pub submit_timeout_ms: u64,
    /// Timeout for a job group submission
    pub group_timeout_ms: u64,
    /// Minimum spacing between two requests; 0 disables it
    pub min_request_interval_ms: u64,
    /// Total tries for a GET answered with 500 or 503. The default of 1 means
    /// no retry.
    pub max_retries: u32,
    /// Pause between two tries
    pub retry_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            private_key: String::new(),
            sandbox: true,
            api_url: None,
            timeout_ms: 10_000,
            submit_timeout_ms: 30_000,
            group_timeout_ms: 300_000,
            min_request_interval_ms: 500,
            max_retries: 1,
            retry_delay_ms: 5_000,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key)
            .field("private_key", &"<redacted>")
            .field("sandbox", &self.sandbox)
            .field("api_url", &self.api_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("submit_timeout_ms", &self.submit_timeout_ms)
            .field("group_timeout_ms", &self.group_timeout_ms)
            .field("min_request_interval_ms", &self.min_request_interval_ms)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration for the given key pair with default settings
    pub fn new(api_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            private_key: private_key.into(),
            ..Default::default()
        }
    }

    /// Use the sandbox or the production API
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Send requests to an explicit base URL instead of the public endpoints
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_key = std::env::var("GENGO_API_KEY").map_err(|_| GengoError::ConfigError {
            message: "GENGO_API_KEY environment variable is required".to_string(),
        })?;

        let private_key =
            std::env::var("GENGO_PRIVATE_KEY").map_err(|_| GengoError::ConfigError {
                message: "GENGO_PRIVATE_KEY environment variable is required".to_string(),
            })?;

        let sandbox = match std::env::var("GENGO_SANDBOX") {
            Ok(value) => parse_flag("GENGO_SANDBOX", &value)?,
            Err(_) => defaults.sandbox,
        };

        let config = Self {
            api_key,
            private_key,
            sandbox,
            api_url: std::env::var("GENGO_API_URL").ok(),
            timeout_ms: env_number("GENGO_TIMEOUT_MS", defaults.timeout_ms)?,
            submit_timeout_ms: env_number("GENGO_SUBMIT_TIMEOUT_MS", defaults.submit_timeout_ms)?,
            group_timeout_ms: env_number("GENGO_GROUP_TIMEOUT_MS", defaults.group_timeout_ms)?,
            min_request_interval_ms: env_number(
                "GENGO_MIN_REQUEST_INTERVAL_MS",
                defaults.min_request_interval_ms,
            )?,
            max_retries: env_number("GENGO_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: env_number("GENGO_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
        };

        info!(sandbox = config.sandbox, "Loaded configuration from environment");
        Ok(config)
    }

    /// Load from an ini file with a `[config]` section
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .set_default(key("sandbox"), true)?
            .add_source(config::File::from(path).format(config::FileFormat::Ini))
            .build()?;

        let defaults = Self::default();
        let int_or = |name: &str, default: u64| -> Result<u64> {
            match settings.get_int(&key(name)) {
                Ok(value) => u64::try_from(value).map_err(|_| GengoError::ConfigError {
                    message: format!("{} must not be negative", name),
                }),
                Err(config::ConfigError::NotFound(_)) => Ok(default),
                Err(e) => Err(e.into()),
            }
        };

        let max_retries = int_or("max_retries", defaults.max_retries as u64)?;
        let config = Self {
            api_key: settings.get_string(&key("api_key"))?,
            private_key: settings.get_string(&key("private_key"))?,
            sandbox: settings.get_bool(&key("sandbox"))?,
            api_url: settings.get_string(&key("api_url")).ok(),
            timeout_ms: int_or("timeout_ms", defaults.timeout_ms)?,
            submit_timeout_ms: int_or("submit_timeout_ms", defaults.submit_timeout_ms)?,
            group_timeout_ms: int_or("group_timeout_ms", defaults.group_timeout_ms)?,
            min_request_interval_ms: int_or(
                "min_request_interval_ms",
                defaults.min_request_interval_ms,
            )?,
            max_retries: u32::try_from(max_retries).map_err(|_| GengoError::ConfigError {
                message: "max_retries is too large".to_string(),
            })?,
            retry_delay_ms: int_or("retry_delay_ms", defaults.retry_delay_ms)?,
        };

        info!(
            path = %path.display(),
            sandbox = config.sandbox,
            "Loaded configuration from file"
        );
        Ok(config)
    }

    /// Base URL every API path is joined onto; always ends with `/`
    pub fn base_url(&self) -> String {
        let url = match &self.api_url {
            Some(url) => url.as_str(),
            None if self.sandbox => SANDBOX_API_URL,
            None => API_URL,
        };

        if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{}/", url)
        }
    }

    /// Timeout for ordinary requests
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Timeout for submitting a single job
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_millis(self.submit_timeout_ms)
    }

    /// Timeout for submitting a group of jobs
    pub fn group_timeout(&self) -> Duration {
        Duration::from_millis(self.group_timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(config_error("API key is required"));
        }

        if self.private_key.trim().is_empty() {
            return Err(config_error("Private key is required"));
        }

        if self.timeout_ms == 0 || self.submit_timeout_ms == 0 || self.group_timeout_ms == 0 {
            return Err(config_error("timeouts must be greater than 0"));
        }

        if self.max_retries == 0 {
            return Err(config_error("max_retries must be at least 1"));
        }

        reqwest::Url::parse(&self.base_url()).map_err(|e| GengoError::ConfigError {
            message: format!("Invalid API URL {}: {}", self.base_url(), e),
        })?;

        if !self.sandbox && self.api_url.is_none() {
            warn!("Using the production myGengo API; submitted jobs will be billed");
        }

        Ok(())
    }
}

fn key(name: &str) -> String {
    format!("{}.{}", INI_SECTION, name)
}

fn config_error(message: &str) -> GengoError {
    GengoError::ConfigError {
        message: message.to_string(),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GengoError::ConfigError {
            message: format!("{} must be a boolean, got {:?}", name, other),
        }),
    }
}

fn env_number<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match std::env::var(name) {
        Ok(value) => value.trim().parse::<T>().map_err(|_| GengoError::ConfigError {
            message: format!("{} must be a non-negative integer, got {:?}", name, value),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_validation() {
        let config = ClientConfig::new("test_key", "test_private");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_key() {
        let config = ClientConfig {
            private_key: "secret".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(GengoError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_defaults_send_each_request_once() {
        let config = ClientConfig::default();
        assert_eq!(config.max_retries, 1);
        assert!(config.sandbox);
        assert_eq!(config.min_request_interval_ms, 500);
    }

    #[test]
    fn test_config_validation_zero_retries() {
        let config = ClientConfig {
            max_retries: 0,
            ..ClientConfig::new("key", "secret")
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_selection() {
        let config = ClientConfig::new("key", "secret");
        assert_eq!(config.base_url(), SANDBOX_API_URL);

        let live = config.clone().with_sandbox(false);
        assert_eq!(live.base_url(), API_URL);

        let local = config.with_api_url("http://127.0.0.1:8080/v1");
        assert_eq!(local.base_url(), "http://127.0.0.1:8080/v1/");
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = ClientConfig::new("public", "very-secret-value");
        let output = format!("{:?}", config);

        assert!(output.contains("public"));
        assert!(!output.contains("very-secret-value"));
    }

    #[test]
    fn test_from_ini_file() {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        writeln!(
            file,
            "[config]\napi_key = abc\nprivate_key = xyz\nsandbox = 0\ntimeout_ms = 2500"
        )
        .unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.private_key, "xyz");
        assert!(!config.sandbox);
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn test_from_ini_file_defaults_to_sandbox() {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        writeln!(file, "[config]\napi_key = abc\nprivate_key = xyz").unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert!(config.sandbox);
        assert_eq!(config.base_url(), SANDBOX_API_URL);
    }

    #[test]
    fn test_from_ini_file_missing_private_key() {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        writeln!(file, "[config]\napi_key = abc").unwrap();

        assert!(matches!(
            ClientConfig::from_file(file.path()),
            Err(GengoError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("X", "1").unwrap());
        assert!(!parse_flag("X", "off").unwrap());
        assert!(parse_flag("X", "maybe").is_err());
    }
}
