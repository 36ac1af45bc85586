//! Per-domain scan records and the snapshot shape
//!
//! Field names and null semantics here are the on-disk contract of
//! scan.json; other tooling reads it, so they must not drift.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::escape::escape_html;
use crate::version::OnionVersion;

/// Result of scanning one watched domain.
///
/// `has_onion` is tri-state: `Some(true)` (advertises an onion service),
/// `Some(false)` (confirmed absent), `None` (could not determine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub has_onion: Option<bool>,
    pub version: Option<OnionVersion>,
    pub onion_url: Option<String>,
}

impl ScanRecord {
    /// Domain advertises an onion service. The URL is HTML-escaped here,
    /// before it is persisted or rendered anywhere.
    pub fn onion(version: OnionVersion, onion_url: &str) -> Self {
        Self {
            has_onion: Some(true),
            version: Some(version),
            onion_url: Some(escape_html(onion_url)),
        }
    }

    /// Domain answered, no onion advertisement found.
    pub fn no_onion() -> Self {
        Self {
            has_onion: Some(false),
            version: None,
            onion_url: None,
        }
    }

    /// Probing failed or the advertised address was unclassifiable.
    pub fn unknown() -> Self {
        Self {
            has_onion: None,
            version: None,
            onion_url: None,
        }
    }
}

/// One scan run's results, keyed by watched domain. Insertion order
/// carries no meaning; `rank` imposes the presentation order.
pub type ResultSet = HashMap<String, ScanRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_field_names_and_nulls() {
        let json = serde_json::to_string(&ScanRecord::onion(
            OnionVersion::V3,
            "http://example.onion",
        ))
        .unwrap();
        assert_eq!(
            json,
            r#"{"has_onion":true,"version":3,"onion_url":"http://example.onion"}"#
        );

        let json = serde_json::to_string(&ScanRecord::no_onion()).unwrap();
        assert_eq!(json, r#"{"has_onion":false,"version":null,"onion_url":null}"#);

        let json = serde_json::to_string(&ScanRecord::unknown()).unwrap();
        assert_eq!(json, r#"{"has_onion":null,"version":null,"onion_url":null}"#);
    }

    #[test]
    fn test_onion_url_stored_escaped() {
        let record = ScanRecord::onion(OnionVersion::V3, "http://x.onion/?q=<script>");
        assert_eq!(
            record.onion_url.as_deref(),
            Some("http://x.onion/?q=&lt;script&gt;")
        );
    }

    #[test]
    fn test_snapshot_round_trips() {
        let record = ScanRecord::onion(OnionVersion::V2, "http://x.onion");
        let parsed: ScanRecord =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(parsed, record);
    }
}
