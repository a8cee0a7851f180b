// # Challenge Provider Trait
//
// Defines the interface for publishing DNS-01 challenge records via provider APIs.
//
// ## Implementations
//
// - SakuraCloud: `dns01-provider-sakuracloud` crate
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::ChallengeProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* ChallengeProvider implementation */;
//
//     provider.present("example.com", "token", "token.thumbprint").await?;
//
//     let (timeout, interval) = provider.timeout();
//     // ... wait for propagation, let the CA validate ...
//
//     provider.clean_up("example.com", "token", "token.thumbprint").await?;
//     Ok(())
// }
// ```

use crate::config::{DEFAULT_POLLING_INTERVAL, DEFAULT_PROPAGATION_TIMEOUT, ProviderConfig};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for DNS-01 challenge provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Scope
///
/// Providers are single-shot integrations:
///
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Return success or failure (the caller decides whether to retry)
/// - ❌ Spawn tasks or threads
/// - ❌ Retry, back off, or poll DNS for propagation
/// - ❌ Cache zone state beyond a single call
///
/// The caller waits for propagation using the bounds from [`timeout`].
///
/// [`timeout`]: ChallengeProvider::timeout
#[async_trait]
pub trait ChallengeProvider: Send + Sync {
    /// Create the TXT record that fulfils the challenge
    ///
    /// # Parameters
    ///
    /// - `domain`: The domain being validated (e.g., "example.com" or "*.example.com")
    /// - `token`: The ACME challenge token (unused by DNS-01 record naming)
    /// - `key_auth`: The key authorization; the record value is derived from it
    async fn present(&self, domain: &str, token: &str, key_auth: &str)
    -> Result<(), crate::Error>;

    /// Remove the TXT record created by [`present`](ChallengeProvider::present)
    ///
    /// Removing a record that is already gone is not an error.
    async fn clean_up(
        &self,
        domain: &str,
        token: &str,
        key_auth: &str,
    ) -> Result<(), crate::Error>;

    /// Propagation timeout and polling interval for the caller's polling loop
    fn timeout(&self) -> (Duration, Duration) {
        (DEFAULT_PROPAGATION_TIMEOUT, DEFAULT_POLLING_INTERVAL)
    }

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing challenge providers from configuration
pub trait ProviderFactory: Send + Sync {
    /// Create a ChallengeProvider instance from configuration
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ChallengeProvider>, crate::Error>;
}
