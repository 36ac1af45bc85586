//! Status page regeneration
//!
//! The page is a hand-authored HTML file with a machine-managed region
//! delimited by two sentinel comments. Everything outside the region is
//! preserved byte-for-byte; the region itself is rebuilt from the ranked
//! scan results on every run, so regeneration is idempotent apart from
//! the timestamp line.

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::record::ScanRecord;
use crate::version::OnionVersion;

/// Marker comment delimiting the managed region. Must occur exactly
/// twice in the page.
pub const SENTINEL: &str = "<!--- CUT -->";

const V3_ONION: &str =
    r#"<li class="list-group-item list-group-item-success">③ &nbsp;&nbsp;"#;
const V2_ONION: &str =
    r#"<li class="list-group-item list-group-item-warning">② &nbsp;&nbsp;"#;
const NO_ONION: &str = r#"<li class="list-group-item list-group-item-danger"><svg width="1em" height="1em" viewBox="0 0 16 16" class="bi bi-x" fill="currentColor" xmlns="http://www.w3.org/2000/svg"><path fill-rule="evenodd" d="M11.854 4.146a.5.5 0 0 1 0 .708l-7 7a.5.5 0 0 1-.708-.708l7-7a.5.5 0 0 1 .708 0z"/><path fill-rule="evenodd" d="M4.146 4.146a.5.5 0 0 0 0 .708l7 7a.5.5 0 0 0 .708-.708l-7-7a.5.5 0 0 0-.708 0z"/></svg>&nbsp;&nbsp;"#;
const NO_DATA: &str = r#"<li class="list-group-item list-group-item-secondary"> <svg width="1em" height="1em" viewBox="0 0 16 16" class="bi bi-cloud-slash" fill="currentColor" xmlns="http://www.w3.org/2000/svg"><path fill-rule="evenodd" d="M3.112 5.112a3.125 3.125 0 0 0-.17.613C1.266 6.095 0 7.555 0 9.318 0 11.366 1.708 13 3.781 13H11l-1-1H3.781C2.231 12 1 10.785 1 9.318c0-1.365 1.064-2.513 2.46-2.666l.446-.05v-.447c0-.075.006-.152.018-.231l-.812-.812zm2.55-1.45l-.725-.725A5.512 5.512 0 0 1 8 2c2.69 0 4.923 2 5.166 4.579C14.758 6.804 16 8.137 16 9.773a3.2 3.2 0 0 1-1.516 2.711l-.733-.733C14.498 11.378 15 10.626 15 9.773c0-1.216-1.02-2.228-2.313-2.228h-.5v-.5C12.188 4.825 10.328 3 8 3c-.875 0-1.678.26-2.339.661zm7.984 10.692l-12-12 .708-.708 12 12-.707.707z"/></svg>&nbsp;&nbsp;"#;
const TERMINATOR: &str = "</li>";

/// Errors from page regeneration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("expected exactly 2 sentinel markers in the page, found {found}")]
    MalformedTemplate { found: usize },
}

/// Rebuild the managed region of `document` from `ranked`, leaving the
/// surrounding prefix and suffix untouched.
pub fn regenerate(
    document: &str,
    ranked: &[(String, ScanRecord)],
    now: DateTime<Local>,
) -> Result<String, PageError> {
    let parts: Vec<&str> = document.split(SENTINEL).collect();
    if parts.len() != 3 {
        return Err(PageError::MalformedTemplate {
            found: parts.len() - 1,
        });
    }
    let (prefix, suffix) = (parts[0], parts[2]);

    let mut body = String::from("\n");
    for (domain, record) in ranked {
        body.push_str(list_item_opener(record));
        body.push_str(&domain_link(domain, record));
        body.push_str(TERMINATOR);
        body.push('\n');
    }
    body.push_str(&format!(
        r#"<li class="list-last-updated">Last updated: {}</li>"#,
        now.format("%m/%d/%Y, %H:%M:%S")
    ));
    body.push('\n');

    Ok(format!("{prefix}{SENTINEL}{body}{SENTINEL}{suffix}"))
}

/// 4-way status switch for the list item's class and icon.
fn list_item_opener(record: &ScanRecord) -> &'static str {
    match (record.has_onion, record.version) {
        (Some(true), Some(OnionVersion::V3)) => V3_ONION,
        (Some(true), Some(OnionVersion::V2)) => V2_ONION,
        (Some(false), _) => NO_ONION,
        _ => NO_DATA,
    }
}

/// Anchor built from the watched domain name. When an onion URL is
/// known, its (already escaped) value rides along as the title.
fn domain_link(domain: &str, record: &ScanRecord) -> String {
    match (&record.has_onion, &record.onion_url) {
        (Some(true), Some(url)) => {
            format!(r#"<a href="http://{domain}/" title="{url}">{domain}</a>"#)
        }
        _ => format!(r#"<a href="http://{domain}/">{domain}</a>"#),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn template() -> String {
        format!("<html>\n<ul>\n{SENTINEL}\nstale\n{SENTINEL}\n</ul>\n</html>\n")
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2021, 3, 14, 9, 26, 53).unwrap()
    }

    fn sample() -> Vec<(String, ScanRecord)> {
        vec![
            (
                "a.com".into(),
                ScanRecord::onion(OnionVersion::V3, "http://a.onion"),
            ),
            (
                "b.com".into(),
                ScanRecord::onion(OnionVersion::V2, "http://b.onion"),
            ),
            ("c.com".into(), ScanRecord::no_onion()),
            ("d.com".into(), ScanRecord::unknown()),
        ]
    }

    #[test]
    fn test_regenerate_preserves_prefix_and_suffix() {
        let out = regenerate(&template(), &sample(), fixed_now()).unwrap();
        assert!(out.starts_with("<html>\n<ul>\n<!--- CUT -->"));
        assert!(out.ends_with("<!--- CUT -->\n</ul>\n</html>\n"));
        assert!(!out.contains("stale"));
    }

    #[test]
    fn test_regenerate_renders_all_four_statuses() {
        let out = regenerate(&template(), &sample(), fixed_now()).unwrap();
        assert!(out.contains(r#"list-group-item-success">③"#));
        assert!(out.contains(r#"list-group-item-warning">②"#));
        assert!(out.contains("list-group-item-danger"));
        assert!(out.contains("list-group-item-secondary"));
        assert!(out.contains(r#"<a href="http://c.com/">c.com</a>"#));
        assert!(out.contains("Last updated: 03/14/2021, 09:26:53"));
    }

    #[test]
    fn test_regenerate_is_idempotent() {
        let once = regenerate(&template(), &sample(), fixed_now()).unwrap();
        let twice = regenerate(&once, &sample(), fixed_now()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_regenerate_keeps_onion_url_escaped() {
        let ranked = vec![(
            "evil.com".into(),
            ScanRecord::onion(OnionVersion::V3, "http://x.onion/?q=<script>"),
        )];
        let out = regenerate(&template(), &ranked, fixed_now()).unwrap();
        assert!(out.contains("&lt;script&gt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_missing_sentinel_is_fatal() {
        let doc = format!("<html>{SENTINEL}only one</html>");
        assert_eq!(
            regenerate(&doc, &sample(), fixed_now()),
            Err(PageError::MalformedTemplate { found: 1 })
        );
    }

    #[test]
    fn test_extra_sentinel_is_fatal() {
        let doc = format!("<p>{SENTINEL}a{SENTINEL}b{SENTINEL}c</p>");
        assert_eq!(
            regenerate(&doc, &sample(), fixed_now()),
            Err(PageError::MalformedTemplate { found: 3 })
        );
    }
}
