//! Sitemap-Crawler main entry point
//!
//! This is the command-line interface: it crawls one site and writes its
//! sitemap files into a destination directory.

use anyhow::{bail, Context};
use clap::Parser;
use sitemap_crawler::config::{load_config, validate, Config};
use sitemap_crawler::crawler::ProgressSnapshot;
use sitemap_crawler::output::print_report;
use sitemap_crawler::storage::open_store;
use sitemap_crawler::{CrawlPolicy, Crawler, SiteAddress};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitemap-Crawler: crawls a single site and writes its sitemap
///
/// Follows same-site links breadth-first from the root URL, honoring
/// robots.txt and `meta robots` directives, and writes the collected pages
/// as sitemap XML files.
#[derive(Parser, Debug)]
#[command(name = "sitemap-crawler")]
#[command(version)]
#[command(about = "Crawls a site and writes its sitemap", long_about = None)]
struct Cli {
    /// Root URL of the site to crawl
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Directory the sitemap files are written to
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Maximum number of links to collect
    #[arg(long)]
    limit: Option<usize>,

    /// Maximum path depth to follow
    #[arg(long)]
    depth: Option<u32>,

    /// Number of concurrent requests
    #[arg(long)]
    threads: Option<u32>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Discard stored links for the site and crawl it again
    #[arg(long)]
    rescan: bool,

    /// Log every page and decision
    #[arg(long, conflicts_with = "quiet")]
    debug: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Returns the site URL and destination, which are both mandatory
    fn required(&self) -> anyhow::Result<(&str, &Path)> {
        let Some(url) = self.url.as_deref() else {
            bail!("Missing site URL, pass it with --url <URL>");
        };
        let Some(dest) = self.dest.as_deref() else {
            bail!("Missing destination directory, pass it with --dest <DIR>");
        };
        Ok((url, dest))
    }

    /// Loads the configuration file, if any, and applies flag overrides
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                load_config(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(limit) = self.limit {
            config.crawler.total_link_limit = limit;
        }
        if let Some(depth) = self.depth {
            config.crawler.max_depth = depth;
        }
        if let Some(threads) = self.threads {
            config.crawler.threads = threads;
        }

        validate(&config).context("Invalid crawl settings")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug, cli.quiet);

    let (url, dest) = cli.required()?;
    if !dest.is_dir() {
        bail!("{} is not a directory", dest.display());
    }

    let config = cli.load_config()?;
    let policy = CrawlPolicy::from_config(&config);
    let site = SiteAddress::parse(url).with_context(|| format!("Invalid site URL {}", url))?;

    let store = open_store(&config.storage, site.site_key())
        .with_context(|| format!("Failed to open link store for {}", site.site_key()))?;

    tracing::info!(
        "Crawling {} (depth {}, limit {}, {} threads)",
        site.site_key(),
        policy.max_depth,
        policy.total_link_limit,
        policy.threads_limit
    );

    let on_progress = |progress: ProgressSnapshot| {
        tracing::info!(
            "Progress: {} pages scanned, {} links stored, {} in queue",
            progress.scanned,
            progress.stored,
            progress.queued
        );
    };
    let mut crawler = Crawler::new(site, policy, store)?.with_progress(Box::new(on_progress));

    let report = if cli.rescan {
        crawler.rescan().await?
    } else {
        crawler.crawl().await?
    };

    if !cli.quiet {
        print_report(&report);
    }

    match crawler.save_xml(dest) {
        Some(output) if output.sitemaps.is_empty() => {
            tracing::warn!("No links were stored, no sitemap written");
        }
        Some(output) => {
            for path in output.sitemaps.iter().chain(output.index.iter()) {
                tracing::info!("Wrote {}", path.display());
            }
        }
        None => bail!("Failed to write sitemap to {}", dest.display()),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` takes precedence over the flags when it is set.
fn setup_logging(debug: bool, quiet: bool) {
    let default = if quiet {
        "error"
    } else if debug {
        "sitemap_crawler=debug,info"
    } else {
        "sitemap_crawler=info,warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
