//! Concurrent scan of the watch list
//!
//! Probes every watched domain and assembles one `ScanRecord` per
//! domain. A failing domain degrades to an unknown record; it never
//! aborts the batch and never goes missing from the output.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use onionwatch_core::{classify, ResultSet, ScanRecord, WwwPolicy};

use crate::inspect::HeaderInspector;
use crate::probe::{probe, ProbeOutcome};

/// Scan configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum domains probed at once
    pub max_concurrent: usize,
    /// Host normalization used when classifying advertised addresses
    pub www_policy: WwwPolicy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            www_policy: WwwPolicy::default(),
        }
    }
}

/// Probe all `domains` and return a record for each one.
pub async fn scan<I: HeaderInspector>(
    inspector: &I,
    domains: &[String],
    config: &ScanConfig,
) -> ResultSet {
    let results: Vec<(String, ScanRecord)> = stream::iter(domains.iter().cloned())
        .map(|domain| {
            let www_policy = config.www_policy;
            async move {
                let record = scan_domain(inspector, &domain, www_policy).await;
                (domain, record)
            }
        })
        .buffer_unordered(config.max_concurrent.max(1))
        .collect()
        .await;

    info!("scanned {} domains", results.len());
    results.into_iter().collect()
}

async fn scan_domain<I: HeaderInspector>(
    inspector: &I,
    domain: &str,
    www_policy: WwwPolicy,
) -> ScanRecord {
    match probe(inspector, domain).await {
        ProbeOutcome::Available(onion_url) => match classify(&onion_url, www_policy) {
            Ok(version) => {
                info!("{}: onion service available ({:?})", domain, version);
                ScanRecord::onion(version, &onion_url)
            }
            // Advertised but unparseable reads the same as "could not
            // determine".
            Err(e) => {
                warn!("{}: advertised onion address not classifiable: {}", domain, e);
                ScanRecord::unknown()
            }
        },
        ProbeOutcome::NotAvailable => ScanRecord::no_onion(),
        ProbeOutcome::Inconclusive => ScanRecord::unknown(),
    }
}
