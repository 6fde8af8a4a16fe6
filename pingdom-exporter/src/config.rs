//! Configuration management
//!
//! Default values, Pingdom credentials and the runtime settings assembled from
//! the `server` subcommand arguments.

use std::fmt;
use std::time::Duration;

use crate::error::{ExporterError, ExporterResult};

/// Default Pingdom API base URL
pub const DEFAULT_API_URL: &str = "https://api.pingdom.com";

/// Default poll interval (seconds)
pub const DEFAULT_WAIT_SECS: u64 = 10;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Pingdom API credentials
///
/// Built from the positional arguments of the `server` subcommand: three for a
/// single account, four when an account email is given (multi-account mode).
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Pingdom user name
    pub username: String,
    /// Pingdom password
    pub password: String,
    /// Application key
    pub api_key: String,
    /// Account email for multi-account mode
    pub account_email: Option<String>,
}

impl Credentials {
    /// Build credentials from positional arguments
    pub fn from_positionals(args: &[String]) -> ExporterResult<Self> {
        match args {
            [username, password, api_key] => Ok(Self {
                username: username.clone(),
                password: password.clone(),
                api_key: api_key.clone(),
                account_email: None,
            }),
            [username, password, api_key, account_email] => Ok(Self {
                username: username.clone(),
                password: password.clone(),
                api_key: api_key.clone(),
                account_email: Some(account_email.clone()),
            }),
            other => Err(ExporterError::Usage(format!(
                "expected 3 or 4 positional arguments, got {}",
                other.len()
            ))),
        }
    }

    /// Returns true in multi-account mode
    pub fn is_multi_account(&self) -> bool {
        self.account_email.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .field("account_email", &self.account_email)
            .finish()
    }
}

/// Runtime settings of the exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Seconds between Pingdom API calls
    pub wait_secs: u64,
    /// Pingdom API base URL
    pub api_url: String,
}

impl ExporterConfig {
    /// Validate and build the configuration
    pub fn new(host: String, port: u16, wait_secs: u64, api_url: String) -> ExporterResult<Self> {
        if wait_secs == 0 {
            return Err(ExporterError::Config(
                "wait must be at least 1 second".to_string(),
            ));
        }
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ExporterError::Config(format!(
                "invalid Pingdom API URL: {}",
                api_url
            )));
        }
        Ok(Self {
            host,
            port,
            wait_secs,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Delay between poll cycles
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            wait_secs: DEFAULT_WAIT_SECS,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}
