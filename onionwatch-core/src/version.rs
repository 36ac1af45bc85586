//! Onion-service protocol version classification
//!
//! A V3 address is 56 base32 characters plus ".onion" (62 total), a V2
//! address is 16 plus ".onion" (22 total). Classification is a pure
//! string function over the host and path of a discovered URL; no
//! network access.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{V2_ADDR_LEN, V3_ADDR_LEN};

/// Onion-service protocol generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnionVersion {
    V2,
    V3,
}

impl OnionVersion {
    /// Numeric form used in the snapshot (2 or 3)
    pub fn as_number(&self) -> u8 {
        match self {
            OnionVersion::V2 => 2,
            OnionVersion::V3 => 3,
        }
    }
}

// The snapshot stores the version as a bare number, so other tooling
// reading scan.json sees 2/3/null rather than enum names.
impl Serialize for OnionVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_number())
    }
}

impl<'de> Deserialize<'de> for OnionVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            2 => Ok(OnionVersion::V2),
            3 => Ok(OnionVersion::V3),
            other => Err(de::Error::custom(format!(
                "unknown onion version: {other}"
            ))),
        }
    }
}

/// Errors from version classification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("unrecognized onion address length: {0}")]
    InvalidAddress(String),
}

/// How to normalize a host whose first label looks like "www" before
/// measuring its length
///
/// The two variants disagree on hosts with more than one label in front
/// of the address proper; `StripFirstLabel` is the authoritative default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WwwPolicy {
    /// Drop exactly the first dot-label
    #[default]
    StripFirstLabel,
    /// Keep only the final two dot-labels
    KeepLastTwoLabels,
}

/// Classify an onion URL or bare address by its character length.
///
/// The address may arrive as a full URL (the usual Onion-Location form)
/// or as a bare `xxx.onion` string; a scheme-less input is measured as a
/// path component. Host and path are measured independently, and either
/// matching the V3 or V2 length decides the version.
pub fn classify(input: &str, policy: WwwPolicy) -> Result<OnionVersion, ClassifyError> {
    let (host, path) = match Url::parse(input) {
        Ok(parsed) => (
            parsed.host_str().unwrap_or("").to_string(),
            parsed.path().trim_start_matches('/').to_string(),
        ),
        // Scheme-less addresses don't parse as absolute URLs; treat the
        // whole input as the path, the way the header value arrives.
        Err(_) => (String::new(), input.to_string()),
    };

    let host = normalize_host(&host, policy);

    if host.len() == V3_ADDR_LEN || path.len() == V3_ADDR_LEN {
        Ok(OnionVersion::V3)
    } else if host.len() == V2_ADDR_LEN || path.len() == V2_ADDR_LEN {
        Ok(OnionVersion::V2)
    } else {
        let offending = if host.is_empty() { path } else { host };
        Err(ClassifyError::InvalidAddress(offending))
    }
}

/// Strip a leading "www"-ish label per the configured policy.
fn normalize_host(host: &str, policy: WwwPolicy) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    let leading_www = labels.first().is_some_and(|label| label.contains("www"));
    if !leading_www {
        return host.to_string();
    }

    match policy {
        WwwPolicy::StripFirstLabel => labels[1..].join("."),
        WwwPolicy::KeepLastTwoLabels => {
            if labels.len() >= 2 {
                labels[labels.len() - 2..].join(".")
            } else {
                host.to_string()
            }
        }
    }
}
