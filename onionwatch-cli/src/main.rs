//! onionwatch CLI
//!
//! Scans a watch list of domains for Onion-Location advertisements,
//! persists the results as scan.json, and regenerates the status page.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use onionwatch_core::{classify, rank, regenerate, ResultSet, ScanRecord, WwwPolicy};
use onionwatch_net::{scan, HttpInspector, InspectConfig, ScanConfig};

#[derive(Parser)]
#[command(name = "onionwatch")]
#[command(author, version, about = "Onion-service availability watcher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1")]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the watch list, write the snapshot, and rewrite the page
    Scan {
        /// Newline-delimited list of domains to watch
        #[arg(long, default_value = "watched.txt")]
        watchlist: PathBuf,

        /// Where the JSON snapshot is written
        #[arg(long, default_value = "scan.json")]
        snapshot: PathBuf,

        /// Status page rewritten in place
        #[arg(long, default_value = "docs/index.html")]
        page: PathBuf,

        /// Maximum domains probed at once
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Per-request timeout in seconds
        #[arg(long, default_value = "10")]
        timeout: u64,

        /// How to normalize a leading "www" label before classification
        #[arg(long, value_enum, default_value_t = WwwPolicyArg::StripFirstLabel)]
        www_policy: WwwPolicyArg,
    },

    /// Classify a single onion URL or address
    Classify {
        /// Onion URL or bare address
        address: String,

        #[arg(long, value_enum, default_value_t = WwwPolicyArg::StripFirstLabel)]
        www_policy: WwwPolicyArg,
    },

    /// Rewrite the page from an existing snapshot without probing
    Render {
        #[arg(long, default_value = "scan.json")]
        snapshot: PathBuf,

        #[arg(long, default_value = "docs/index.html")]
        page: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WwwPolicyArg {
    StripFirstLabel,
    KeepLastTwoLabels,
}

impl From<WwwPolicyArg> for WwwPolicy {
    fn from(arg: WwwPolicyArg) -> Self {
        match arg {
            WwwPolicyArg::StripFirstLabel => WwwPolicy::StripFirstLabel,
            WwwPolicyArg::KeepLastTwoLabels => WwwPolicy::KeepLastTwoLabels,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Scan {
            watchlist,
            snapshot,
            page,
            concurrency,
            timeout,
            www_policy,
        } => {
            run_scan(
                &watchlist,
                &snapshot,
                &page,
                concurrency,
                timeout,
                www_policy.into(),
            )
            .await?;
        }
        Commands::Classify {
            address,
            www_policy,
        } => {
            let version = classify(&address, www_policy.into())?;
            println!("{:?} (onion service version {})", version, version.as_number());
        }
        Commands::Render { snapshot, page } => {
            run_render(&snapshot, &page)?;
        }
    }

    Ok(())
}

async fn run_scan(
    watchlist: &Path,
    snapshot: &Path,
    page: &Path,
    concurrency: usize,
    timeout: u64,
    www_policy: WwwPolicy,
) -> Result<()> {
    let raw = fs::read_to_string(watchlist)
        .with_context(|| format!("failed to read watch list {}", watchlist.display()))?;
    let domains = parse_watchlist(&raw);
    info!("watching {} domains", domains.len());

    let inspector = HttpInspector::new(&InspectConfig {
        timeout_secs: timeout,
        ..Default::default()
    })?;
    let config = ScanConfig {
        max_concurrent: concurrency,
        www_policy,
    };

    let results = scan(&inspector, &domains, &config).await;
    let ranked = rank(results);

    write_snapshot(snapshot, &ranked)?;
    rewrite_page(page, &ranked)?;

    let available = ranked
        .iter()
        .filter(|(_, r)| r.has_onion == Some(true))
        .count();
    let undetermined = ranked.iter().filter(|(_, r)| r.has_onion.is_none()).count();
    println!(
        "✅ Scanned {} domains: {} with onion services, {} undetermined",
        ranked.len(),
        available,
        undetermined
    );
    println!("📄 Snapshot: {}", snapshot.display());
    println!("📄 Page: {}", page.display());

    Ok(())
}

fn run_render(snapshot: &Path, page: &Path) -> Result<()> {
    let raw = fs::read_to_string(snapshot)
        .with_context(|| format!("failed to read snapshot {}", snapshot.display()))?;
    let results: ResultSet = serde_json::from_str(&raw)
        .with_context(|| format!("malformed snapshot {}", snapshot.display()))?;

    let ranked = rank(results);
    rewrite_page(page, &ranked)?;

    println!("📄 Rewrote {} from {}", page.display(), snapshot.display());
    Ok(())
}

/// One domain per line; blank lines and `#` comments are skipped.
fn parse_watchlist(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Write the snapshot with keys in ranked order.
fn write_snapshot(path: &Path, ranked: &[(String, ScanRecord)]) -> Result<()> {
    let mut snapshot = serde_json::Map::new();
    for (domain, record) in ranked {
        snapshot.insert(domain.clone(), serde_json::to_value(record)?);
    }
    let body = serde_json::to_string(&snapshot)?;
    fs::write(path, body)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;
    Ok(())
}

/// Read-regenerate-write on the status page. The page is only written
/// after regeneration succeeds, so a malformed template leaves the file
/// untouched.
fn rewrite_page(path: &Path, ranked: &[(String, ScanRecord)]) -> Result<()> {
    let document = fs::read_to_string(path)
        .with_context(|| format!("failed to read page {}", path.display()))?;
    let updated = regenerate(&document, ranked, Local::now())?;
    fs::write(path, updated)
        .with_context(|| format!("failed to write page {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use onionwatch_core::OnionVersion;

    #[test]
    fn test_parse_watchlist_skips_blanks_and_comments() {
        let raw = "example.com\n\n# a comment\n  spaced.org  \n";
        assert_eq!(parse_watchlist(raw), vec!["example.com", "spaced.org"]);
    }

    #[test]
    fn test_snapshot_written_in_ranked_order() {
        let ranked = vec![
            (
                "v3.com".to_string(),
                ScanRecord::onion(OnionVersion::V3, "http://a.onion"),
            ),
            ("none.com".to_string(), ScanRecord::unknown()),
        ];
        let dir = std::env::temp_dir().join("onionwatch-snapshot-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scan.json");
        write_snapshot(&path, &ranked).unwrap();

        let body = fs::read_to_string(&path).unwrap();
        let v3_at = body.find("v3.com").unwrap();
        let none_at = body.find("none.com").unwrap();
        assert!(v3_at < none_at);
        assert!(body.contains(r#""has_onion":null"#));
    }
}
