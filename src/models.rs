//! Wire types for the Key Vault REST responses.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Deserialize;

/// One page of the certificate version listing.
#[derive(Debug, Deserialize)]
pub struct CertificateVersionPage {
    /// Version items on this page.
    #[serde(default)]
    pub value: Vec<CertificateVersionItem>,
    /// Absolute URL of the next page, when the listing is not exhausted.
    #[serde(rename = "nextLink", default)]
    pub next_link: Option<String>,
}

/// One certificate version as returned by the listing.
#[derive(Debug, Deserialize)]
pub struct CertificateVersionItem {
    /// Opaque resource identifier; the version is its final path segment.
    pub id: String,
    /// Version attributes; absent attributes are treated as disabled.
    #[serde(default)]
    pub attributes: Option<VersionAttributes>,
}

/// Attributes attached to a certificate version.
#[derive(Debug, Deserialize)]
pub struct VersionAttributes {
    /// Whether the version is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Last-updated timestamp (unix seconds on the wire).
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub updated: Option<DateTime<Utc>>,
}

/// A vault secret at a specific version.
#[derive(Debug, Deserialize)]
pub struct SecretBundle {
    /// Base64-encoded PKCS#12 container.
    pub value: SecretString,
    /// Content type recorded on the secret, informational only.
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_version_page_deserializes() {
        let body = serde_json::json!({
            "value": [
                {
                    "id": "https://v.vault.azure.net/certificates/tls/abc123",
                    "attributes": { "enabled": true, "updated": 1_700_000_000 }
                },
                { "id": "https://v.vault.azure.net/certificates/tls/def456" }
            ],
            "nextLink": "https://v.vault.azure.net/certificates/tls/versions?page=2"
        });

        let page: CertificateVersionPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.value.len(), 2);
        assert!(page.value[0].attributes.as_ref().unwrap().enabled);
        assert!(page.value[1].attributes.is_none());
        assert!(page.next_link.is_some());
    }

    #[test]
    fn test_secret_bundle_deserializes() {
        let body = serde_json::json!({
            "value": "AAEC",
            "contentType": "application/x-pkcs12"
        });

        let bundle: SecretBundle = serde_json::from_value(body).unwrap();
        assert_eq!(bundle.value.expose_secret(), "AAEC");
        assert_eq!(bundle.content_type.as_deref(), Some("application/x-pkcs12"));
    }
}
