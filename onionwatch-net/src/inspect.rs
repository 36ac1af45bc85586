//! HTTP header inspection
//!
//! An inspector fetches the response headers a domain serves on its
//! HTTPS endpoints. The trait exists so the scan pipeline can run
//! against a mock in tests, or against a richer security-posture
//! inspector later.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Endpoint id for `https://{domain}/`
pub const ENDPOINT_HTTPS: &str = "https";

/// Endpoint id for `https://www.{domain}/`
pub const ENDPOINT_HTTPS_WWW: &str = "httpswww";

/// Response headers from one endpoint, as received (keys not lowercased).
pub type Headers = HashMap<String, String>;

/// Headers per endpoint. `None` means the endpoint did not answer at
/// all, which is evidence of absence, not an inspection failure.
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    pub endpoints: HashMap<String, Option<Headers>>,
}

/// Errors from the probing machinery itself. Distinct from a domain
/// simply not answering.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("could not form a probe request for {domain}: {source}")]
    BadRequest {
        domain: String,
        source: reqwest::Error,
    },
}

/// Inspector configuration
#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with probe requests
    pub user_agent: String,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36".to_string(),
        }
    }
}

/// Something that can fetch a domain's per-endpoint response headers.
#[async_trait]
pub trait HeaderInspector: Send + Sync {
    async fn inspect(&self, domain: &str) -> Result<Inspection, ProbeError>;
}

/// Direct reqwest-backed inspector hitting the apex and www HTTPS
/// endpoints.
pub struct HttpInspector {
    client: Client,
}

impl HttpInspector {
    pub fn new(config: &InspectConfig) -> Result<Self, ProbeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ProbeError::ClientBuild(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HeaderInspector for HttpInspector {
    async fn inspect(&self, domain: &str) -> Result<Inspection, ProbeError> {
        let targets = [
            (ENDPOINT_HTTPS, format!("https://{domain}/")),
            (ENDPOINT_HTTPS_WWW, format!("https://www.{domain}/")),
        ];

        let mut endpoints = HashMap::new();
        for (key, url) in targets {
            match self.client.get(&url).send().await {
                Ok(response) => {
                    let headers: Headers = response
                        .headers()
                        .iter()
                        .filter_map(|(name, value)| {
                            value
                                .to_str()
                                .ok()
                                .map(|v| (name.as_str().to_string(), v.to_string()))
                        })
                        .collect();
                    endpoints.insert(key.to_string(), Some(headers));
                }
                // A request we never managed to form is our problem;
                // anything else means the endpoint has nothing for us.
                Err(e) if e.is_builder() => {
                    return Err(ProbeError::BadRequest {
                        domain: domain.to_string(),
                        source: e,
                    });
                }
                Err(e) => {
                    debug!("endpoint {} gave no response: {}", url, e);
                    endpoints.insert(key.to_string(), None);
                }
            }
        }

        Ok(Inspection { endpoints })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InspectConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert!(config.user_agent.contains("Mozilla"));
    }

    #[test]
    fn test_build_inspector() {
        assert!(HttpInspector::new(&InspectConfig::default()).is_ok());
    }
}
