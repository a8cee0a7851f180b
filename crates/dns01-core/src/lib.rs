// # dns01-core
//
// Core library for DNS-01 challenge providers.
//
// ## Architecture Overview
//
// This library provides the pieces every DNS-01 provider plugin shares:
// - **ChallengeProvider**: Trait for publishing and removing challenge TXT records
// - **ChallengeInfo**: Computes the challenge FQDN and TXT value from a key authorization
// - **ProviderRegistry**: Plugin-based registry for challenge providers
// - **ProviderConfig**: Serializable provider configuration, loadable from env or JSON
//
// ## Design Principles
//
// 1. **Thin providers**: A provider turns one call into one API mutation
// 2. **Caller-owned polling**: Propagation checks and retries belong to the caller
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: All functionality can be used as a library

pub mod challenge;
pub mod config;
pub mod env;
pub mod error;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use challenge::ChallengeInfo;
pub use config::{ProviderConfig, SakuraCloudConfig};
pub use error::{Error, Result};
pub use registry::ProviderRegistry;
pub use traits::{ChallengeProvider, ProviderFactory};
