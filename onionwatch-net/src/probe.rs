//! Tri-state availability probe
//!
//! "Header absent" and "probe broke" are different facts and stay
//! different here: a domain that answered without an Onion-Location
//! header is `NotAvailable`, a domain we could not inspect at all is
//! `Inconclusive`. Neither stops the rest of the batch.

use tracing::{debug, warn};

use crate::inspect::{HeaderInspector, ENDPOINT_HTTPS, ENDPOINT_HTTPS_WWW};

/// Header advertising the onion-service equivalent of a page
pub const ONION_LOCATION: &str = "onion-location";

/// What one domain's probe concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// An Onion-Location header was found; carries its raw value
    Available(String),
    /// The domain answered but advertises no onion service
    NotAvailable,
    /// The probe itself failed; availability undetermined
    Inconclusive,
}

/// Probe one domain through the given inspector.
pub async fn probe<I: HeaderInspector + ?Sized>(inspector: &I, domain: &str) -> ProbeOutcome {
    let inspection = match inspector.inspect(domain).await {
        Ok(inspection) => inspection,
        Err(e) => {
            warn!("could not inspect {}: {}", domain, e);
            return ProbeOutcome::Inconclusive;
        }
    };

    for key in [ENDPOINT_HTTPS, ENDPOINT_HTTPS_WWW] {
        let Some(Some(headers)) = inspection.endpoints.get(key) else {
            continue;
        };
        let found = headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(ONION_LOCATION));
        if let Some((_, value)) = found {
            if !value.is_empty() {
                debug!("{} advertises onion service at {}", domain, value);
                return ProbeOutcome::Available(value.clone());
            }
        }
    }

    ProbeOutcome::NotAvailable
}
