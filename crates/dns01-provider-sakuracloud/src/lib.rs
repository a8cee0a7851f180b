// # SakuraCloud DNS Provider
//
// This crate provides a SakuraCloud DNS provider for DNS-01 challenges.
//
// ## Behaviour
//
// - ✅ `present` appends one TXT record to the zone hosting `_acme-challenge.<domain>`
// - ✅ `clean_up` removes exactly the TXT records with that name and value
// - ✅ `timeout` reports the configured propagation timeout and polling interval
// - ✅ Zone discovery by longest matching suffix
// - ✅ Dry-run mode for safe testing
// - ✅ Concurrent presents on one zone are serialized (record sets are replaced whole)
// - ❌ NO retry logic (owned by the caller)
// - ❌ NO propagation polling (owned by the caller)
// - ❌ NO zone caching between calls
//
// ## Security Requirements
//
// - Access token and secret NEVER appear in logs or Debug output
// - Provider MUST fail fast if either credential is empty
//
// ## API Reference
//
// - SakuraCloud API v1.1: https://manual.sakura.ad.jp/cloud-api/1.1/
// - Find DNS zones: GET `/commonserviceitem?{"Filter":{"Provider.Class":"dns","Name":...}}`
// - Update DNS records: PUT `/commonserviceitem/:id`

pub mod client;

use async_trait::async_trait;
use client::{DnsZone, ResourceRecord, SakuraCloudClient};
use dns01_core::challenge::{self, ChallengeInfo};
use dns01_core::config::{ProviderConfig, SakuraCloudConfig};
use dns01_core::traits::{ChallengeProvider, ProviderFactory};
use dns01_core::{Error, Result};
use std::time::Duration;
use tokio::sync::Mutex;

/// Provider name, also the prefix of every error message
pub const PROVIDER_NAME: &str = "sakuracloud";

/// User agent sent with every API request
const USER_AGENT: &str = concat!("dns01-sakuracloud/", env!("CARGO_PKG_VERSION"));

/// SakuraCloud DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (zone lookup)
/// - Log the intended PUT payload
/// - **NOT** actually modify DNS records
///
/// # Security
///
/// The Debug implementation does NOT expose the credentials.
pub struct SakuraCloudProvider {
    config: SakuraCloudConfig,

    /// HTTP caller for API requests
    client: SakuraCloudClient,

    /// Held across each read-modify-write of a zone's record set
    update_lock: Mutex<()>,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for SakuraCloudProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SakuraCloudProvider")
            .field("config", &self.config)
            .field("base_url", &self.client.base_url())
            .finish()
    }
}

impl SakuraCloudProvider {
    /// Create a provider from the `SAKURACLOUD_*` environment variables
    ///
    /// `SAKURACLOUD_ACCESS_TOKEN` and `SAKURACLOUD_ACCESS_TOKEN_SECRET` are required.
    pub fn from_env() -> Result<Self> {
        let config = SakuraCloudConfig::from_env().map_err(|e| e.with_provider(PROVIDER_NAME))?;
        Self::new(config)
    }

    /// Create a provider from an explicit configuration
    ///
    /// # Errors
    ///
    /// - `sakuracloud: AccessToken is missing`
    /// - `sakuracloud: AccessSecret is missing`
    /// - invalid settings or API root URL
    pub fn new(config: SakuraCloudConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| e.with_provider(PROVIDER_NAME))?;

        let client = SakuraCloudClient::new(
            client::base_url(&config.api_root_url, &config.zone),
            config.access_token.clone(),
            config.access_token_secret.clone(),
            config.http_timeout(),
            USER_AGENT,
        )
        .map_err(|e| e.with_provider(PROVIDER_NAME))?;

        if config.dry_run {
            tracing::warn!("SakuraCloud provider running in DRY-RUN mode - no changes will be made");
        }

        Ok(Self {
            config,
            client,
            update_lock: Mutex::new(()),
        })
    }

    /// Whether the provider only logs its writes
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Find the zone hosting `fqdn`
    ///
    /// Candidates are tried from the most specific name to the registrable
    /// domain; the first exact name match wins.
    async fn find_zone(&self, fqdn: &str) -> Result<DnsZone> {
        for candidate in challenge::zone_candidates(fqdn) {
            let zones = self.client.find_zones_by_name(candidate).await?;
            if let Some(zone) = zones.into_iter().next() {
                tracing::debug!("Found zone {} (id {}) for {}", zone.name, zone.id, fqdn);
                return Ok(zone);
            }
        }

        Err(Error::not_found(format!(
            "zone for {} not found",
            challenge::un_fqdn(fqdn)
        )))
    }

    /// Write a zone's record set, or log it in dry-run mode
    async fn write_records(&self, zone: &DnsZone, records: &[ResourceRecord]) -> Result<()> {
        if self.config.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {}/commonserviceitem/{} with payload: {}",
                self.client.base_url(),
                zone.id,
                client::update_payload(records, zone.settings_hash.as_deref())
            );
            return Ok(());
        }

        self.client
            .update_settings(&zone.id, records, zone.settings_hash.as_deref())
            .await
    }

    async fn add_txt_record(&self, fqdn: &str, value: &str, ttl: u32) -> Result<()> {
        let _guard = self.update_lock.lock().await;

        let zone = self.find_zone(fqdn).await?;
        let name = challenge::extract_record_name(fqdn, &zone.name);

        let mut records = zone.records().to_vec();
        records.push(ResourceRecord::txt(name.as_str(), value, ttl));

        tracing::info!(
            "{} TXT record {} in zone {} [mode: {}]",
            if self.config.dry_run { "Would add" } else { "Adding" },
            name,
            zone.name,
            if self.config.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        self.write_records(&zone, &records).await
    }

    async fn cleanup_txt_record(&self, fqdn: &str, value: &str) -> Result<()> {
        let _guard = self.update_lock.lock().await;

        let zone = self.find_zone(fqdn).await?;
        let name = challenge::extract_record_name(fqdn, &zone.name);

        let records: Vec<ResourceRecord> = zone
            .records()
            .iter()
            .filter(|record| !record.is_txt(&name, value))
            .cloned()
            .collect();

        let removed = zone.records().len() - records.len();
        if removed == 0 {
            tracing::info!("TXT record {} already absent from zone {}", name, zone.name);
            return Ok(());
        }

        tracing::info!(
            "{} {} TXT record(s) {} from zone {}",
            if self.config.dry_run { "Would remove" } else { "Removing" },
            removed,
            name,
            zone.name
        );

        self.write_records(&zone, &records).await
    }
}

#[async_trait]
impl ChallengeProvider for SakuraCloudProvider {
    /// Create a TXT record to fulfil the DNS-01 challenge
    async fn present(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        let info = ChallengeInfo::new(domain, key_auth);

        self.add_txt_record(&info.effective_fqdn, &info.value, self.config.ttl)
            .await
            .map_err(|e| e.with_provider(PROVIDER_NAME))?;

        tracing::info!("Challenge record presented for {}", domain);
        Ok(())
    }

    /// Remove the TXT record matching the challenge
    async fn clean_up(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        let info = ChallengeInfo::new(domain, key_auth);

        self.cleanup_txt_record(&info.effective_fqdn, &info.value)
            .await
            .map_err(|e| e.with_provider(PROVIDER_NAME))
    }

    fn timeout(&self) -> (Duration, Duration) {
        (
            self.config.propagation_timeout(),
            self.config.polling_interval(),
        )
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

/// Factory for creating SakuraCloud providers
pub struct SakuraCloudFactory;

impl ProviderFactory for SakuraCloudFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ChallengeProvider>> {
        match config {
            ProviderConfig::SakuraCloud(config) => {
                Ok(Box::new(SakuraCloudProvider::new(config.clone())?))
            }
            _ => Err(Error::config("Invalid config for SakuraCloud provider")),
        }
    }
}

/// Register the SakuraCloud provider with a registry
///
/// # Example
///
/// ```rust
/// use dns01_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// dns01_provider_sakuracloud::register(&registry);
/// assert!(registry.has_provider("sakuracloud"));
/// ```
pub fn register(registry: &dns01_core::ProviderRegistry) {
    registry.register_provider(PROVIDER_NAME, Box::new(SakuraCloudFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SakuraCloudConfig {
        SakuraCloudConfig::new("test_token", "test_secret")
    }

    #[test]
    fn test_factory_creation() {
        let factory = SakuraCloudFactory;
        let provider = factory.create(&ProviderConfig::SakuraCloud(config()));
        assert!(provider.is_ok());
    }

    #[test]
    fn test_factory_rejects_other_config() {
        let factory = SakuraCloudFactory;
        let other = ProviderConfig::Custom {
            factory: "other".to_string(),
            config: serde_json::json!({}),
        };
        assert!(factory.create(&other).is_err());
    }

    #[test]
    fn test_missing_credentials() {
        let err = SakuraCloudProvider::new(SakuraCloudConfig::new("", "secret")).unwrap_err();
        assert_eq!(err.to_string(), "sakuracloud: AccessToken is missing");

        let err = SakuraCloudProvider::new(SakuraCloudConfig::new("token", "")).unwrap_err();
        assert_eq!(err.to_string(), "sakuracloud: AccessSecret is missing");
    }

    #[test]
    fn test_invalid_api_root() {
        let mut config = config();
        config.api_root_url = "not a url".to_string();
        let err = SakuraCloudProvider::new(config).unwrap_err();
        assert!(err.to_string().starts_with("sakuracloud: Invalid API root URL"));
    }

    #[test]
    fn test_timeout_comes_from_config() {
        let mut config = config();
        config.propagation_timeout_secs = 180;
        config.polling_interval_secs = 5;

        let provider = SakuraCloudProvider::new(config).unwrap();
        assert_eq!(
            provider.timeout(),
            (Duration::from_secs(180), Duration::from_secs(5))
        );
    }

    #[test]
    fn test_default_timeout() {
        let provider = SakuraCloudProvider::new(config()).unwrap();
        assert_eq!(
            provider.timeout(),
            (Duration::from_secs(60), Duration::from_secs(2))
        );
    }

    #[test]
    fn test_zone_override_and_root_trim() {
        let mut config = config();
        config.zone = "tk1a".to_string();
        config.api_root_url = "https://example.invalid/cloud/zone/".to_string();

        let provider = SakuraCloudProvider::new(config).unwrap();
        assert_eq!(
            provider.client.base_url(),
            "https://example.invalid/cloud/zone/tk1a/api/cloud/1.1"
        );
    }

    #[test]
    fn test_credentials_not_exposed_in_debug() {
        let provider =
            SakuraCloudProvider::new(SakuraCloudConfig::new("secret_token_12345", "secret_key_678"))
                .unwrap();

        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret_token_12345"));
        assert!(!debug_str.contains("secret_key_678"));
        assert!(debug_str.contains("SakuraCloudProvider"));
    }

    #[test]
    fn test_provider_name_and_register() {
        let provider = SakuraCloudProvider::new(config()).unwrap();
        assert_eq!(provider.provider_name(), "sakuracloud");

        let registry = dns01_core::ProviderRegistry::new();
        register(&registry);
        assert!(registry.has_provider("sakuracloud"));
        assert!(
            registry
                .create_provider(&ProviderConfig::SakuraCloud(config()))
                .is_ok()
        );
    }
}
