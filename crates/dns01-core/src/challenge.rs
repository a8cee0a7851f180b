//! DNS-01 challenge record naming and value computation
//!
//! A DNS-01 challenge for `example.com` is proven by a TXT record at
//! `_acme-challenge.example.com.` whose value is the base64url-encoded
//! SHA-256 digest of the key authorization.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sha2::{Digest, Sha256};

/// ACME challenge record name prefix
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// Record name and value for one DNS-01 challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeInfo {
    /// The challenge FQDN, always dot-terminated
    /// (e.g., "_acme-challenge.example.com.")
    pub fqdn: String,

    /// The FQDN the record is actually written to.
    ///
    /// Equal to `fqdn`; CNAME delegation of the challenge name is resolved by
    /// the caller before it reaches a provider.
    pub effective_fqdn: String,

    /// The TXT record value
    pub value: String,
}

impl ChallengeInfo {
    /// Compute challenge info for a domain and key authorization
    ///
    /// Wildcard domains (`*.example.com`) share the base domain's record.
    /// The name is lowercased; DNS names compare case-insensitively.
    pub fn new(domain: &str, key_auth: &str) -> Self {
        let domain = normalize_domain(domain);
        let fqdn = to_fqdn(&format!("{}.{}", ACME_CHALLENGE_LABEL, un_fqdn(domain)))
            .to_ascii_lowercase();

        Self {
            effective_fqdn: fqdn.clone(),
            fqdn,
            value: challenge_value(key_auth),
        }
    }
}

/// Compute the TXT value for a key authorization
pub fn challenge_value(key_auth: &str) -> String {
    let digest = Sha256::digest(key_auth.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Strip a leading wildcard label
fn normalize_domain(domain: &str) -> &str {
    domain.strip_prefix("*.").unwrap_or(domain)
}

/// Dot-terminate a name
pub fn to_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Remove the trailing dot of a name, if any
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Extract a record name relative to its zone
///
/// - `_acme-challenge.example.com.` in `example.com` → `_acme-challenge`
/// - `_acme-challenge.sub.example.com.` in `example.com` → `_acme-challenge.sub`
/// - `example.com.` in `example.com` → `@`
/// - names outside the zone are returned unqualified and unchanged
///
/// Only a trailing `.zone` is stripped, compared case-insensitively.
pub fn extract_record_name(fqdn: &str, zone: &str) -> String {
    let name = un_fqdn(fqdn);
    let zone = un_fqdn(zone);

    if name.eq_ignore_ascii_case(zone) {
        return "@".to_string();
    }

    match strip_zone_suffix(name, zone) {
        Some(relative) => relative.to_string(),
        None => name.to_string(),
    }
}

/// The part of `name` before a trailing `.zone`, if it has one
fn strip_zone_suffix<'a>(name: &'a str, zone: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(zone.len() + 1)?;
    let relative = name.get(..split)?;
    let suffix = name.get(split..)?.strip_prefix('.')?;

    (!relative.is_empty() && suffix.eq_ignore_ascii_case(zone)).then_some(relative)
}

/// Candidate zone names for a name, most specific first
///
/// `_acme-challenge.sub.example.com.` yields
/// `_acme-challenge.sub.example.com`, `sub.example.com`, `example.com`.
/// Bare top-level labels are never candidates.
pub fn zone_candidates(fqdn: &str) -> Vec<&str> {
    let mut current = un_fqdn(fqdn);
    let mut candidates = Vec::new();

    while current.contains('.') {
        candidates.push(current);
        match current.find('.') {
            Some(pos) => current = &current[pos + 1..],
            None => break,
        }
    }

    candidates
}
