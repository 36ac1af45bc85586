//! Deterministic ordering of scan results for presentation

use crate::record::{ResultSet, ScanRecord};
use crate::version::OnionVersion;

/// Order results: V3 first, then V2, then everything without a
/// determined version; ties broken by case-insensitive domain name.
pub fn rank(results: ResultSet) -> Vec<(String, ScanRecord)> {
    let mut entries: Vec<(String, ScanRecord)> = results.into_iter().collect();
    entries.sort_by_key(|(domain, record)| {
        let group = match record.version {
            Some(OnionVersion::V3) => 0u8,
            Some(OnionVersion::V2) => 1,
            None => 2,
        };
        // The raw domain is a final tie-break so case-variant duplicates
        // still order deterministically.
        (group, domain.to_lowercase(), domain.clone())
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_groups_by_version_then_domain() {
        let mut results = ResultSet::new();
        results.insert("a.com".into(), ScanRecord::onion(OnionVersion::V3, "u"));
        results.insert("b.com".into(), ScanRecord::onion(OnionVersion::V2, "u"));
        results.insert("c.com".into(), ScanRecord::unknown());
        results.insert("B.com".into(), ScanRecord::onion(OnionVersion::V3, "u"));

        let ordered: Vec<String> = rank(results).into_iter().map(|(d, _)| d).collect();
        assert_eq!(ordered, vec!["a.com", "B.com", "b.com", "c.com"]);
    }

    #[test]
    fn test_rank_versionless_sorts_last_regardless_of_has_onion() {
        let mut results = ResultSet::new();
        results.insert("absent.com".into(), ScanRecord::no_onion());
        results.insert("unknown.com".into(), ScanRecord::unknown());
        results.insert("z.com".into(), ScanRecord::onion(OnionVersion::V2, "u"));

        let ordered: Vec<String> = rank(results).into_iter().map(|(d, _)| d).collect();
        assert_eq!(ordered, vec!["z.com", "absent.com", "unknown.com"]);
    }
}
