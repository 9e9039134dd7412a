//! Kagami command line tool
//!
//! `kagami parse` turns release names into JSON tokens; `kagami scan`
//! reconciles a list of paths against a user's AniList catalog.
//! Both read their input from stdin, one item per line, and write JSON
//! to stdout. Logs go to stderr.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use kagami_catalog::MatchConfig;
use kagami_core::{FileStatus, FilenameParser};
use kagami_scan::providers::anilist::ANILIST_ENDPOINT;
use kagami_scan::providers::anizip::ANIZIP_BASE_URL;
use kagami_scan::{AniListClient, AniZipClient, RateLimitConfig, ScanConfig, Scanner};
use serde::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Default config file location
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kagami")
        .join("config.toml")
}

#[derive(Parser)]
#[command(name = "kagami")]
#[command(about = "Match local anime files against AniList and fetch episode metadata")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to <config dir>/kagami/config.toml)
    #[arg(short, long, env = "KAGAMI_CONFIG", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse release names read from stdin, one JSON object per line
    Parse,
    /// Scan paths read from stdin against an AniList user's catalog
    Scan {
        /// AniList user name
        #[arg(short, long, env = "KAGAMI_ANILIST_USER")]
        user: Option<String>,

        /// Minimum title similarity for a match
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Sequel/prequel hops to follow from tracked entries
        #[arg(long)]
        relation_depth: Option<usize>,

        /// Pretty-print the JSON outcome
        #[arg(long)]
        pretty: bool,
    },
}

/// Settings read from the TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    user: Option<String>,
    matching: Option<MatchConfig>,
    relation_depth: Option<usize>,
    fetch_timeout_secs: Option<u64>,
    negative_ttl_secs: Option<u64>,
    hydration_concurrency: Option<usize>,
    anilist: ServiceConfig,
    anizip: ServiceConfig,
}

/// Endpoint and pacing for one external service.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServiceConfig {
    url: Option<String>,
    interval_ms: Option<u64>,
    max_concurrent: Option<usize>,
}

impl ServiceConfig {
    fn limit(&self, base: RateLimitConfig) -> RateLimitConfig {
        let mut limit = base;
        if let Some(ms) = self.interval_ms {
            limit = limit.with_interval(Duration::from_millis(ms));
        }
        if let Some(max) = self.max_concurrent {
            limit = limit.with_max_concurrent(max);
        }
        limit
    }
}

impl ConfigFile {
    /// Loads the file at `path`. A missing file at the default location
    /// yields the defaults; a missing explicit file is an error.
    fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path(), false),
        };
        if !explicit && !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn scan_config(&self) -> ScanConfig {
        let mut config = ScanConfig::new()
            .with_catalog_limit(self.anilist.limit(RateLimitConfig::catalog()))
            .with_enrichment_limit(self.anizip.limit(RateLimitConfig::enrichment()));

        if let Some(matching) = &self.matching {
            config = config.with_matching(
                MatchConfig::new()
                    .with_threshold(matching.threshold)
                    .with_offset_resolution(matching.resolve_offsets),
            );
        }
        if let Some(depth) = self.relation_depth {
            config = config.with_relation_depth(depth);
        }
        if let Some(secs) = self.fetch_timeout_secs {
            config = config.with_fetch_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.negative_ttl_secs {
            config = config.with_negative_ttl(Duration::from_secs(secs));
        }
        if let Some(n) = self.hydration_concurrency {
            config = config.with_hydration_concurrency(n);
        }
        config
    }
}

/// Non-empty, trimmed lines from a reader.
fn read_lines(reader: impl BufRead) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}

fn run_parse() -> Result<()> {
    let parser = FilenameParser::new().context("Failed to build filename parser")?;
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens = parser.parse_path(Path::new(line));
        serde_json::to_writer(&mut out, &tokens)?;
        writeln!(out)?;
    }
    Ok(())
}

async fn run_scan(
    file: ConfigFile,
    user: Option<String>,
    threshold: Option<f64>,
    relation_depth: Option<usize>,
    pretty: bool,
) -> Result<()> {
    let Some(user) = user.or_else(|| file.user.clone()) else {
        bail!("No AniList user given (use --user, KAGAMI_ANILIST_USER or the config file)");
    };

    let mut config = file.scan_config();
    if let Some(threshold) = threshold {
        let matching = config.matching.clone().with_threshold(threshold);
        config = config.with_matching(matching);
    }
    if let Some(depth) = relation_depth {
        config = config.with_relation_depth(depth);
    }

    let anilist = AniListClient::with_endpoint(
        file.anilist.url.as_deref().unwrap_or(ANILIST_ENDPOINT),
        &user,
    )
    .context("Failed to build AniList client")?;
    let anizip = AniZipClient::with_base_url(file.anizip.url.as_deref().unwrap_or(ANIZIP_BASE_URL))
        .context("Failed to build ani.zip client")?;

    let paths = read_lines(io::stdin().lock())?;
    info!(user = %user, files = paths.len(), "starting scan");

    let scanner = Scanner::new(Arc::new(anilist), Arc::new(anizip), config)?;
    let outcome = scanner.scan(&paths).await.context("Scan failed")?;

    info!(
        catalog = outcome.catalog_size,
        unmatched = outcome.count(FileStatus::Unmatched),
        matched = outcome.count(FileStatus::Matched),
        hydrated = outcome.count(FileStatus::Hydrated),
        "scan complete"
    );

    let mut out = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, &outcome)?;
    } else {
        serde_json::to_writer(&mut out, &outcome)?;
    }
    writeln!(out)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse => run_parse(),
        Commands::Scan {
            user,
            threshold,
            relation_depth,
            pretty,
        } => {
            let file = ConfigFile::load(cli.config.as_deref())?;
            run_scan(file, user, threshold, relation_depth, pretty).await
        }
    }
}
