//! Test doubles and common utilities for provider contract tests
//!
//! This module provides a minimal in-memory provider that records the
//! challenge records it was asked to publish.

use dns01_core::config::ProviderConfig;
use dns01_core::error::{Error, Result};
use dns01_core::traits::{ChallengeProvider, ProviderFactory};
use dns01_core::ChallengeInfo;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A mock ChallengeProvider that stores records in memory
#[derive(Clone)]
pub struct MemoryProvider {
    /// Published records: fqdn -> values
    records: Arc<std::sync::Mutex<HashMap<String, Vec<String>>>>,
    /// Call counter for present()
    present_call_count: Arc<AtomicUsize>,
    /// Call counter for clean_up()
    clean_up_call_count: Arc<AtomicUsize>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self {
            records: Arc::new(std::sync::Mutex::new(HashMap::new())),
            present_call_count: Arc::new(AtomicUsize::new(0)),
            clean_up_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Values currently published at a name
    pub fn values(&self, fqdn: &str) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .get(fqdn)
            .cloned()
            .unwrap_or_default()
    }

    /// Get the number of times present() was called
    pub fn present_call_count(&self) -> usize {
        self.present_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times clean_up() was called
    pub fn clean_up_call_count(&self) -> usize {
        self.clean_up_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ChallengeProvider for MemoryProvider {
    async fn present(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        self.present_call_count.fetch_add(1, Ordering::SeqCst);
        let info = ChallengeInfo::new(domain, key_auth);
        self.records
            .lock()
            .unwrap()
            .entry(info.effective_fqdn)
            .or_default()
            .push(info.value);
        Ok(())
    }

    async fn clean_up(&self, domain: &str, _token: &str, key_auth: &str) -> Result<()> {
        self.clean_up_call_count.fetch_add(1, Ordering::SeqCst);
        let info = ChallengeInfo::new(domain, key_auth);
        if let Some(values) = self.records.lock().unwrap().get_mut(&info.effective_fqdn) {
            values.retain(|v| *v != info.value);
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory handing out clones of one shared MemoryProvider
pub struct MemoryFactory {
    pub provider: MemoryProvider,
}

impl ProviderFactory for MemoryFactory {
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn ChallengeProvider>> {
        match config {
            ProviderConfig::Custom { factory, .. } if factory == "memory" => {
                Ok(Box::new(self.provider.clone()))
            }
            _ => Err(Error::config("Invalid config for memory provider")),
        }
    }
}

/// Config selecting the memory provider
pub fn memory_config() -> ProviderConfig {
    ProviderConfig::Custom {
        factory: "memory".to_string(),
        config: serde_json::json!({}),
    }
}
