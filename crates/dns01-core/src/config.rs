//! Configuration types for DNS-01 providers
//!
//! This module defines all configuration structures used throughout the crate.

use crate::env;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default TTL for challenge TXT records (seconds)
pub const DEFAULT_TTL: u32 = 120;

/// Default time the caller waits for a record to propagate
pub const DEFAULT_PROPAGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default interval between propagation checks
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(2);

/// Default timeout for a single provider API request
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable selecting `dry-run` or `live` mode
pub const ENV_MODE: &str = "DNS01_MODE";

/// SakuraCloud environment variable names
pub mod sakuracloud_env {
    pub const ACCESS_TOKEN: &str = "SAKURACLOUD_ACCESS_TOKEN";
    pub const ACCESS_TOKEN_SECRET: &str = "SAKURACLOUD_ACCESS_TOKEN_SECRET";
    pub const TTL: &str = "SAKURACLOUD_TTL";
    pub const PROPAGATION_TIMEOUT: &str = "SAKURACLOUD_PROPAGATION_TIMEOUT";
    pub const POLLING_INTERVAL: &str = "SAKURACLOUD_POLLING_INTERVAL";
    pub const HTTP_TIMEOUT: &str = "SAKURACLOUD_HTTP_TIMEOUT";
    pub const ZONE: &str = "SAKURACLOUD_ZONE";
    pub const API_ROOT_URL: &str = "SAKURACLOUD_API_ROOT_URL";
}

/// Default SakuraCloud API root
pub const SAKURACLOUD_API_ROOT: &str = "https://secure.sakura.ad.jp/cloud/zone";

/// Default SakuraCloud API zone; DNS is a global service reachable from any zone
pub const SAKURACLOUD_DEFAULT_ZONE: &str = "is1a";

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// SakuraCloud DNS
    #[serde(rename = "sakuracloud")]
    SakuraCloud(SakuraCloudConfig),

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        match self {
            ProviderConfig::SakuraCloud(config) => config.validate(),
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(Error::config("Custom provider factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(Error::config("Custom provider config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::SakuraCloud(_) => "sakuracloud",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }

    /// Load a provider configuration from a JSON file
    ///
    /// ```json
    /// { "type": "sakuracloud", "access_token": "...", "access_token_secret": "..." }
    /// ```
    ///
    /// Validation errors carry the provider name, as in `sakuracloud: AccessToken is missing`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: ProviderConfig = serde_json::from_str(&raw)?;
        config
            .validate()
            .map_err(|e| e.with_provider(config.type_name()))?;
        Ok(config)
    }
}

/// SakuraCloud DNS provider configuration
///
/// # Security
///
/// The Debug implementation does NOT expose the credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct SakuraCloudConfig {
    /// API access token
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub access_token: String,

    /// API access token secret
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub access_token_secret: String,

    /// TTL of the challenge TXT record (seconds)
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// How long the caller waits for propagation (seconds)
    #[serde(default = "default_propagation_timeout_secs")]
    pub propagation_timeout_secs: u64,

    /// How often the caller rechecks propagation (seconds)
    #[serde(default = "default_polling_interval_secs")]
    pub polling_interval_secs: u64,

    /// Per-request HTTP timeout (seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// API zone used in request paths (e.g., "is1a", "tk1a")
    #[serde(default = "default_zone")]
    pub zone: String,

    /// API root URL
    #[serde(default = "default_api_root_url")]
    pub api_root_url: String,

    /// Dry-run mode: read zones but never write them
    #[serde(default)]
    pub dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for SakuraCloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SakuraCloudConfig")
            .field("access_token", &"<REDACTED>")
            .field("access_token_secret", &"<REDACTED>")
            .field("ttl", &self.ttl)
            .field("propagation_timeout_secs", &self.propagation_timeout_secs)
            .field("polling_interval_secs", &self.polling_interval_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("zone", &self.zone)
            .field("api_root_url", &self.api_root_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Default for SakuraCloudConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            access_token_secret: String::new(),
            ttl: default_ttl(),
            propagation_timeout_secs: default_propagation_timeout_secs(),
            polling_interval_secs: default_polling_interval_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            zone: default_zone(),
            api_root_url: default_api_root_url(),
            dry_run: false,
        }
    }
}

impl SakuraCloudConfig {
    /// Create a configuration with credentials and default settings
    pub fn new(access_token: impl Into<String>, access_token_secret: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
            ..Self::default()
        }
    }

    /// Default settings read from the environment, without credentials
    pub fn default_from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use sakuracloud_env as names;

        Self {
            access_token: String::new(),
            access_token_secret: String::new(),
            ttl: env::get_or_default_u32(&lookup, names::TTL, DEFAULT_TTL),
            propagation_timeout_secs: env::get_or_default_secs(
                &lookup,
                names::PROPAGATION_TIMEOUT,
                DEFAULT_PROPAGATION_TIMEOUT,
            )
            .as_secs(),
            polling_interval_secs: env::get_or_default_secs(
                &lookup,
                names::POLLING_INTERVAL,
                DEFAULT_POLLING_INTERVAL,
            )
            .as_secs(),
            http_timeout_secs: env::get_or_default_secs(
                &lookup,
                names::HTTP_TIMEOUT,
                DEFAULT_HTTP_TIMEOUT,
            )
            .as_secs(),
            zone: env::get_or_default_string(&lookup, names::ZONE, SAKURACLOUD_DEFAULT_ZONE),
            api_root_url: env::get_or_default_string(
                &lookup,
                names::API_ROOT_URL,
                SAKURACLOUD_API_ROOT,
            ),
            dry_run: lookup(ENV_MODE)
                .is_some_and(|mode| mode.eq_ignore_ascii_case("dry-run")),
        }
    }

    /// Full configuration from a lookup; credentials are required
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values = env::get_required(
            &lookup,
            &[
                sakuracloud_env::ACCESS_TOKEN,
                sakuracloud_env::ACCESS_TOKEN_SECRET,
            ],
        )?;

        let mut config = Self::default_from_lookup(&lookup);
        config.access_token = values[sakuracloud_env::ACCESS_TOKEN].clone();
        config.access_token_secret = values[sakuracloud_env::ACCESS_TOKEN_SECRET].clone();
        Ok(config)
    }

    /// Full configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env::process_env)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(Error::config("AccessToken is missing"));
        }
        if self.access_token_secret.is_empty() {
            return Err(Error::config("AccessSecret is missing"));
        }
        if self.ttl == 0 {
            return Err(Error::config("TTL must be > 0"));
        }
        if self.polling_interval_secs == 0 {
            return Err(Error::config("polling interval must be > 0"));
        }
        if self.http_timeout_secs == 0 {
            return Err(Error::config("HTTP timeout must be > 0"));
        }
        if self.api_root_url.is_empty() {
            return Err(Error::config("API root URL cannot be empty"));
        }
        Ok(())
    }

    /// Propagation timeout as a Duration
    pub fn propagation_timeout(&self) -> Duration {
        Duration::from_secs(self.propagation_timeout_secs)
    }

    /// Polling interval as a Duration
    pub fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling_interval_secs)
    }

    /// HTTP timeout as a Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_propagation_timeout_secs() -> u64 {
    DEFAULT_PROPAGATION_TIMEOUT.as_secs()
}

fn default_polling_interval_secs() -> u64 {
    DEFAULT_POLLING_INTERVAL.as_secs()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}

fn default_zone() -> String {
    SAKURACLOUD_DEFAULT_ZONE.to_string()
}

fn default_api_root_url() -> String {
    SAKURACLOUD_API_ROOT.to_string()
}
