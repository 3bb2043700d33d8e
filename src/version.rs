//! Certificate version selection.
//!
//! The Key Vault listing is not contractually sorted, so the selector
//! drains the full record sequence and tracks a running maximum by
//! last-updated timestamp. Ties are resolved **first seen wins**: a later
//! record only replaces the current best when its timestamp is strictly
//! greater. This keeps selection deterministic for a sequential page drain
//! and is easy to get backwards; do not flip the comparison.

use chrono::{DateTime, Utc};

use crate::models::CertificateVersionItem;

/// One version of a named certificate, as seen by the selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateVersion {
    /// Opaque resource identifier; the version is its final path segment.
    pub id: String,
    /// Whether this version is enabled.
    pub enabled: bool,
    /// Last-updated timestamp.
    pub updated: DateTime<Utc>,
}

impl From<CertificateVersionItem> for CertificateVersion {
    fn from(item: CertificateVersionItem) -> Self {
        let (enabled, updated) = match item.attributes {
            Some(attrs) => (attrs.enabled, attrs.updated.unwrap_or_default()),
            None => (false, DateTime::<Utc>::default()),
        };
        Self {
            id: item.id,
            enabled,
            updated,
        }
    }
}

/// Pick the most-recently-updated enabled version and return its version
/// identifier (the final `/`-separated segment of the record id).
///
/// Returns `None` when the sequence is empty or holds no enabled record;
/// the facade maps that to [`KeyVaultError::NoEnabledVersion`].
///
/// [`KeyVaultError::NoEnabledVersion`]: crate::error::KeyVaultError::NoEnabledVersion
pub fn select_latest_enabled<I>(versions: I) -> Option<String>
where
    I: IntoIterator<Item = CertificateVersion>,
{
    let mut best: Option<CertificateVersion> = None;

    for version in versions {
        if !version.enabled {
            continue;
        }
        // Strictly greater: on equal timestamps the first record seen wins.
        if best
            .as_ref()
            .is_none_or(|current| version.updated > current.updated)
        {
            best = Some(version);
        }
    }

    best.map(|version| version_id(&version.id))
}

fn version_id(id: &str) -> String {
    id.rsplit('/').next().unwrap_or(id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version: &str, enabled: bool, updated_secs: i64) -> CertificateVersion {
        CertificateVersion {
            id: format!("https://unit.vault.azure.net/certificates/tls/{version}"),
            enabled,
            updated: DateTime::from_timestamp(updated_secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_picks_latest_enabled() {
        let selected = select_latest_enabled(vec![
            record("old", true, 100),
            record("newest", true, 300),
            record("middle", true, 200),
        ]);
        assert_eq!(selected.as_deref(), Some("newest"));
    }

    #[test]
    fn test_skips_disabled_even_when_newest() {
        let selected = select_latest_enabled(vec![
            record("enabled-old", true, 100),
            record("disabled-new", false, 900),
        ]);
        assert_eq!(selected.as_deref(), Some("enabled-old"));
    }

    #[test]
    fn test_tie_resolves_to_first_seen() {
        let selected = select_latest_enabled(vec![
            record("first", true, 500),
            record("second", true, 500),
        ]);
        assert_eq!(selected.as_deref(), Some("first"));
    }

    #[test]
    fn test_empty_sequence_selects_nothing() {
        assert_eq!(select_latest_enabled(Vec::new()), None);
    }

    #[test]
    fn test_all_disabled_selects_nothing() {
        let selected = select_latest_enabled(vec![
            record("a", false, 100),
            record("b", false, 200),
        ]);
        assert_eq!(selected, None);
    }

    #[test]
    fn test_version_is_final_path_segment() {
        let selected = select_latest_enabled(vec![record("abc123def", true, 1)]);
        assert_eq!(selected.as_deref(), Some("abc123def"));
    }

    #[test]
    fn test_item_without_attributes_is_disabled() {
        let item = crate::models::CertificateVersionItem {
            id: "https://unit.vault.azure.net/certificates/tls/x".to_string(),
            attributes: None,
        };
        let version = CertificateVersion::from(item);
        assert!(!version.enabled);
    }
}
