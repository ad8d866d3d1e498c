mod models;

pub use models::*;

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{RenderError, Result};

pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Reply wrapper used by the certificate API.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    data: serde_json::Value,
}

/// Fetches certificate records from the certificate API.
pub struct Repository {
    base_url: String,
    client: Client,
}

impl Repository {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(LOOKUP_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self, key: &str, value: &str) -> String {
        format!("{}/api/v1/certificates/{}/{}", self.base_url, value, key)
    }

    /// Looks up the certificate whose `key` field equals `value`.
    pub async fn load_certificate(&self, key: &str, value: &str) -> Result<CertificateRecord> {
        let endpoint = self.endpoint(key, value);
        info!("Loading certificate {}={}", key, value);

        let response = self
            .client
            .get(&endpoint)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!("Certificate API answered {} for {}", status, endpoint);
        }

        let record = parse_envelope(&text)?;
        info!(
            "Loaded {} certificate {}",
            record.collection, record.reference_number
        );
        Ok(record)
    }
}

/// Unwraps an API reply into a record, turning `error: true` into a lookup error.
pub fn parse_envelope(text: &str) -> Result<CertificateRecord> {
    let envelope: Envelope = serde_json::from_str(text)?;
    if envelope.error {
        let message = match envelope.data {
            serde_json::Value::String(message) => message,
            other => other.to_string(),
        };
        return Err(RenderError::Lookup(message));
    }
    Ok(serde_json::from_value(envelope.data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_lookup_endpoint() {
        let repo = Repository::new("https://api.example.com/").unwrap();
        assert_eq!(
            repo.endpoint("reference_number", "REF123"),
            "https://api.example.com/api/v1/certificates/REF123/reference_number"
        );
    }

    #[test]
    fn error_payload_becomes_lookup_error() {
        let err = parse_envelope(r#"{"error": true, "data": "certificate not found"}"#).unwrap_err();
        match err {
            RenderError::Lookup(message) => assert_eq!(message, "certificate not found"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn data_payload_is_parsed() {
        let body = serde_json::json!({
            "error": false,
            "data": {
                "type": "course",
                "reference_number": "REF123",
                "created_at": "2024-03-01T10:00:00Z",
                "metadata": { "name": "Solar", "levels": [] },
                "material": {
                    "owner_certificate": { "first_name": "Ada", "last_name": "Lee" },
                    "school": { "name": "Green School", "logo": "https://cdn.example.com/logo.png" }
                },
                "talent": { "full_name": "Jane Doe" }
            }
        });
        let record = parse_envelope(&body.to_string()).unwrap();
        assert_eq!(record.reference_number, "REF123");
        assert_eq!(record.collection, Collection::Course);
    }

    #[test]
    fn null_profile_fields_do_not_fail_lookup() {
        let body = serde_json::json!({
            "error": false,
            "data": {
                "type": "course",
                "reference_number": "REF123",
                "created_at": "2024-03-01T10:00:00+07:00",
                "metadata": { "name": "Solar", "levels": [] },
                "material": {
                    "owner_certificate": { "first_name": "Ada", "last_name": "Lee", "job_title": null },
                    "school": { "name": "Green School", "logo": "https://cdn.example.com/logo.png", "description": null }
                },
                "talent": { "full_name": "Jane Doe", "avatar": null }
            }
        });
        let record = parse_envelope(&body.to_string()).unwrap();
        assert_eq!(record.talent.full_name, "Jane Doe");
        assert_eq!(record.material.owner.job_title, "");
    }

    #[test]
    fn malformed_payload_is_lookup_error() {
        assert!(matches!(
            parse_envelope("<html>502</html>"),
            Err(RenderError::Lookup(_))
        ));
    }
}
