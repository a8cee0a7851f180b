//! Environment variable helpers for provider configuration
//!
//! Every helper takes a lookup function instead of reading the process
//! environment directly. [`process_env`] is the lookup used in production;
//! tests pass a closure over a map.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::time::Duration;

/// Lookup over the process environment
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Read required values
///
/// Every name must be set to a non-empty value. Missing names are reported
/// together, in the order given.
pub fn get_required<F>(lookup: F, names: &[&str]) -> Result<HashMap<String, String>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut values = HashMap::with_capacity(names.len());
    let mut missing = Vec::new();

    for name in names {
        match lookup(name).filter(|v| !v.is_empty()) {
            Some(value) => {
                values.insert((*name).to_string(), value);
            }
            None => missing.push(*name),
        }
    }

    if !missing.is_empty() {
        return Err(Error::config(format!(
            "some credentials information are missing: {}",
            missing.join(",")
        )));
    }

    Ok(values)
}

/// Read a string, falling back to `default` when unset or empty
pub fn get_or_default_string<F>(lookup: F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read an unsigned integer, falling back to `default` when unset or unparsable
pub fn get_or_default_u32<F>(lookup: F, name: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
            default
        }),
        None => default,
    }
}

/// Read a duration given in whole seconds
pub fn get_or_default_secs<F>(lookup: F, name: &str, default: Duration) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid value for {}: {:?}", name, raw);
                default
            }),
        None => default,
    }
}
