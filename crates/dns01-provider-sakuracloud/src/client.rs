//! SakuraCloud API caller
//!
//! DNS zones are "common service items" with `Provider.Class = "dns"`.
//! A zone's records live in `Settings.DNS.ResourceRecordSets` and are
//! replaced as a whole; `SettingsHash` guards against lost updates.
//!
//! - Find zones: GET `/commonserviceitem?{"Filter":{"Provider.Class":"dns","Name":"..."}}`
//! - Update records: PUT `/commonserviceitem/:id`

use dns01_core::{Error, Result};
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// API version path appended to `{api_root}/{zone}`
const API_PATH: &str = "api/cloud/1.1";

/// Record type of challenge records
pub const TXT: &str = "TXT";

/// A DNS zone as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct DnsZone {
    /// Resource ID
    #[serde(rename = "ID", deserialize_with = "string_or_number")]
    pub id: String,

    /// Zone name (e.g., "example.com")
    #[serde(rename = "Name")]
    pub name: String,

    /// Zone settings
    #[serde(rename = "Settings", default)]
    pub settings: ZoneSettings,

    /// Optimistic concurrency token for settings updates
    #[serde(rename = "SettingsHash", default)]
    pub settings_hash: Option<String>,
}

impl DnsZone {
    /// The zone's resource records
    pub fn records(&self) -> &[ResourceRecord] {
        &self.settings.dns.resource_record_sets
    }
}

/// Zone settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZoneSettings {
    #[serde(rename = "DNS", default)]
    pub dns: DnsSettings,
}

/// DNS settings of a zone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsSettings {
    #[serde(rename = "ResourceRecordSets", default)]
    pub resource_record_sets: Vec<ResourceRecord>,
}

/// One resource record
///
/// Fields this crate doesn't know about are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Type")]
    pub record_type: String,

    #[serde(rename = "RData")]
    pub rdata: String,

    #[serde(rename = "TTL", default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceRecord {
    /// Build a TXT record
    pub fn txt(name: impl Into<String>, value: impl Into<String>, ttl: u32) -> Self {
        Self {
            name: name.into(),
            record_type: TXT.to_string(),
            rdata: value.into(),
            ttl: Some(ttl),
            extra: Map::new(),
        }
    }

    /// Whether this is the TXT record `name` = `value`
    pub fn is_txt(&self, name: &str, value: &str) -> bool {
        self.name == name && self.record_type.eq_ignore_ascii_case(TXT) && self.rdata == value
    }
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(rename = "CommonServiceItems", default)]
    common_service_items: Vec<DnsZone>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    #[serde(rename = "CommonServiceItem")]
    common_service_item: UpdateItem<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateItem<'a> {
    #[serde(rename = "Settings")]
    settings: UpdateSettings<'a>,

    #[serde(rename = "SettingsHash", skip_serializing_if = "Option::is_none")]
    settings_hash: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct UpdateSettings<'a> {
    #[serde(rename = "DNS")]
    dns: UpdateDns<'a>,
}

#[derive(Debug, Serialize)]
struct UpdateDns<'a> {
    #[serde(rename = "ResourceRecordSets")]
    resource_record_sets: &'a [ResourceRecord],
}

/// Build the update payload for a zone's record set
pub fn update_payload(records: &[ResourceRecord], settings_hash: Option<&str>) -> Value {
    let request = UpdateRequest {
        common_service_item: UpdateItem {
            settings: UpdateSettings {
                dns: UpdateDns {
                    resource_record_sets: records,
                },
            },
            settings_hash,
        },
    };
    // Serializing plain structs of strings and numbers cannot fail
    serde_json::to_value(&request).unwrap_or(Value::Null)
}

/// Build the API base URL
///
/// A trailing `/` on the root is trimmed. An empty zone falls back to the
/// default zone.
pub fn base_url(api_root: &str, zone: &str) -> String {
    let zone = if zone.is_empty() {
        dns01_core::config::SAKURACLOUD_DEFAULT_ZONE
    } else {
        zone
    };
    format!("{}/{}/{}", api_root.trim_end_matches('/'), zone, API_PATH)
}

/// HTTP caller for the SakuraCloud API
pub struct SakuraCloudClient {
    http: reqwest::Client,
    base_url: String,
    /// ⚠️ NEVER log this value
    access_token: String,
    /// ⚠️ NEVER log this value
    access_token_secret: String,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for SakuraCloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SakuraCloudClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<REDACTED>")
            .field("access_token_secret", &"<REDACTED>")
            .finish()
    }
}

impl SakuraCloudClient {
    /// Create a new API caller
    pub fn new(
        base_url: String,
        access_token: String,
        access_token_secret: String,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        Url::parse(&base_url)
            .map_err(|e| Error::config(format!("Invalid API root URL {}: {}", base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            access_token,
            access_token_secret,
        })
    }

    /// The API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Find DNS zones whose name is exactly `name`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /commonserviceitem?{"Filter":{"Provider.Class":"dns","Name":"example.com"}}
    /// Authorization: Basic <token:secret>
    /// ```
    pub async fn find_zones_by_name(&self, name: &str) -> Result<Vec<DnsZone>> {
        let mut url = Url::parse(&format!("{}/commonserviceitem", self.base_url))
            .map_err(|e| Error::config(format!("Invalid API URL: {}", e)))?;

        let filter = serde_json::json!({
            "Filter": {
                "Provider.Class": "dns",
                "Name": name,
            }
        });
        url.set_query(Some(&filter.to_string()));

        tracing::debug!("Looking up DNS zone: {}", name);

        let response = self
            .http
            .get(url)
            .basic_auth(&self.access_token, Some(&self.access_token_secret))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("Zone lookup request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let response = check_status(response, "Zone lookup failed").await?;
        let found: FindResponse = response
            .json()
            .await
            .map_err(|e| Error::http(format!("Failed to parse zone lookup response: {}", e)))?;

        Ok(found
            .common_service_items
            .into_iter()
            .filter(|zone| zone.name.eq_ignore_ascii_case(name))
            .collect())
    }

    /// Replace a zone's record set
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /commonserviceitem/:id
    /// {"CommonServiceItem":{"Settings":{"DNS":{"ResourceRecordSets":[...]}},"SettingsHash":"..."}}
    /// ```
    pub async fn update_settings(
        &self,
        zone_id: &str,
        records: &[ResourceRecord],
        settings_hash: Option<&str>,
    ) -> Result<()> {
        let url = format!("{}/commonserviceitem/{}", self.base_url, zone_id);

        let response = self
            .http
            .put(&url)
            .basic_auth(&self.access_token, Some(&self.access_token_secret))
            .json(&update_payload(records, settings_hash))
            .send()
            .await
            .map_err(|e| Error::http(format!("Zone update request failed: {}", e)))?;

        check_status(response, "Zone update failed").await?;
        Ok(())
    }
}

/// Map non-success HTTP statuses to errors
async fn check_status(response: Response, context: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());

    Err(match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "Invalid access token or insufficient permissions. Status: {}",
            status
        )),
        404 => Error::not_found(format!("{}: {} - {}", context, status, error_text)),
        409 => Error::http(format!(
            "Conflict: zone was modified concurrently. Status: {} - {}",
            status, error_text
        )),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::http(format!(
            "SakuraCloud server error (transient): {} - {}",
            status, error_text
        )),
        _ => Error::http(format!("{}: {} - {}", context, status, error_text)),
    })
}

/// Resource IDs are numeric strings, but some API versions return numbers
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number ID, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        assert_eq!(
            base_url("https://secure.sakura.ad.jp/cloud/zone", "is1a"),
            "https://secure.sakura.ad.jp/cloud/zone/is1a/api/cloud/1.1"
        );
        assert_eq!(
            base_url("https://secure.sakura.ad.jp/cloud/zone/", "tk1a"),
            "https://secure.sakura.ad.jp/cloud/zone/tk1a/api/cloud/1.1"
        );
        assert_eq!(
            base_url("http://localhost:8080//", ""),
            "http://localhost:8080/is1a/api/cloud/1.1"
        );
    }

    #[test]
    fn test_zone_deserialization_keeps_unknown_fields() {
        let zone: DnsZone = serde_json::from_value(serde_json::json!({
            "ID": 112900000001u64,
            "Name": "example.com",
            "Settings": {
                "DNS": {
                    "ResourceRecordSets": [
                        { "Name": "www", "Type": "A", "RData": "192.0.2.1", "TTL": 600 },
                        { "Name": "@", "Type": "MX", "RData": "10 mail.example.com.", "Priority": 10 }
                    ]
                }
            },
            "SettingsHash": "abc123"
        }))
        .unwrap();

        assert_eq!(zone.id, "112900000001");
        assert_eq!(zone.records().len(), 2);
        assert_eq!(zone.records()[0].ttl, Some(600));
        assert_eq!(zone.records()[1].ttl, None);
        assert_eq!(zone.records()[1].extra["Priority"], 10);

        let payload = update_payload(zone.records(), zone.settings_hash.as_deref());
        let written = &payload["CommonServiceItem"]["Settings"]["DNS"]["ResourceRecordSets"];
        assert_eq!(written[1]["Priority"], 10);
        assert!(written[1].get("TTL").is_none());
        assert_eq!(payload["CommonServiceItem"]["SettingsHash"], "abc123");
    }

    #[test]
    fn test_zone_without_settings() {
        let zone: DnsZone =
            serde_json::from_value(serde_json::json!({ "ID": "1", "Name": "example.com" }))
                .unwrap();
        assert!(zone.records().is_empty());
        assert!(zone.settings_hash.is_none());
    }

    #[test]
    fn test_is_txt() {
        let record = ResourceRecord::txt("_acme-challenge", "value", 120);
        assert!(record.is_txt("_acme-challenge", "value"));
        assert!(!record.is_txt("_acme-challenge", "other"));
        assert!(!record.is_txt("www", "value"));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client = SakuraCloudClient::new(
            base_url("https://secure.sakura.ad.jp/cloud/zone", "is1a"),
            "token_12345".to_string(),
            "secret_67890".to_string(),
            Duration::from_secs(10),
            "test",
        )
        .unwrap();

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("token_12345"));
        assert!(!debug_str.contains("secret_67890"));
    }
}
