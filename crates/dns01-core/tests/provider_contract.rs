//! Contract Test: Present / CleanUp / Timeout through the registry
//!
//! Constraints verified:
//! - Providers created through the registry see the same challenge records
//!   the caller computed
//! - CleanUp removes exactly the value Present created and is idempotent
//! - Providers that don't override timeout() report the framework defaults
//! - Provider config files round-trip through JSON

mod common;

use common::*;
use dns01_core::config::{DEFAULT_POLLING_INTERVAL, DEFAULT_PROPAGATION_TIMEOUT};
use dns01_core::{
    ChallengeInfo, ChallengeProvider, ProviderConfig, ProviderRegistry, SakuraCloudConfig,
};
use std::io::Write;

fn registry_with(provider: &MemoryProvider) -> ProviderRegistry {
    let registry = ProviderRegistry::new();
    registry.register_provider(
        "memory",
        Box::new(MemoryFactory {
            provider: provider.clone(),
        }),
    );
    registry
}

#[tokio::test]
async fn present_then_clean_up_leaves_no_record() {
    let memory = MemoryProvider::new();
    let registry = registry_with(&memory);
    let provider = registry.create_provider(&memory_config()).expect("provider");

    provider
        .present("example.com", "token", "token.thumbprint")
        .await
        .expect("present succeeds");

    let info = ChallengeInfo::new("example.com", "token.thumbprint");
    assert_eq!(memory.values("_acme-challenge.example.com."), vec![info.value]);

    provider
        .clean_up("example.com", "token", "token.thumbprint")
        .await
        .expect("clean_up succeeds");
    assert!(memory.values("_acme-challenge.example.com.").is_empty());

    // Second cleanup is a no-op
    provider
        .clean_up("example.com", "token", "token.thumbprint")
        .await
        .expect("repeated clean_up succeeds");

    assert_eq!(memory.present_call_count(), 1);
    assert_eq!(memory.clean_up_call_count(), 2);
}

#[tokio::test]
async fn clean_up_only_removes_its_own_value() {
    let memory = MemoryProvider::new();
    let registry = registry_with(&memory);
    let provider = registry.create_provider(&memory_config()).expect("provider");

    // example.com and *.example.com share one record name
    provider.present("example.com", "t1", "first.key").await.unwrap();
    provider.present("*.example.com", "t2", "second.key").await.unwrap();
    assert_eq!(memory.values("_acme-challenge.example.com.").len(), 2);

    provider.clean_up("example.com", "t1", "first.key").await.unwrap();

    let remaining = memory.values("_acme-challenge.example.com.");
    assert_eq!(remaining, vec![ChallengeInfo::new("*.example.com", "second.key").value]);
}

#[test]
fn default_timeout_matches_framework_constants() {
    let memory = MemoryProvider::new();
    let registry = registry_with(&memory);
    let provider = registry.create_provider(&memory_config()).expect("provider");

    assert_eq!(
        provider.timeout(),
        (DEFAULT_PROPAGATION_TIMEOUT, DEFAULT_POLLING_INTERVAL)
    );
    assert_eq!(provider.provider_name(), "memory");
}

#[test]
fn provider_config_loads_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let config = ProviderConfig::SakuraCloud(SakuraCloudConfig::new("token", "secret"));
    write!(file, "{}", serde_json::to_string(&config).unwrap()).unwrap();

    let loaded = ProviderConfig::from_json_file(file.path()).expect("config loads");
    match loaded {
        ProviderConfig::SakuraCloud(c) => {
            assert_eq!(c.access_token, "token");
            assert_eq!(c.access_token_secret, "secret");
            assert_eq!(c.ttl, 120);
        }
        other => panic!("unexpected config: {:?}", other),
    }
}

#[test]
fn provider_config_file_without_credentials_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"type": "sakuracloud", "access_token": "token"}}"#).unwrap();

    let err = ProviderConfig::from_json_file(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "sakuracloud: AccessSecret is missing");
}
