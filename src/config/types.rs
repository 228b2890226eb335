use serde::Deserialize;
use std::path::PathBuf;

/// User agent sent when the configuration does not name one
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; sitemap-crawler/0.1)";

/// File extensions that are never crawled unless the configuration says otherwise
pub const DEFAULT_EXCLUDE_EXTENSIONS: &[&str] =
    &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt"];

/// Main configuration structure for Sitemap-Crawler
///
/// Every section is optional in the TOML file; missing sections and keys fall
/// back to the defaults below. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub download: Option<DownloadConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Maximum path depth of a crawled URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of concurrent fetches per batch
    pub threads: u32,

    /// Maximum number of links stored for one crawl
    #[serde(rename = "total-link-limit")]
    pub total_link_limit: usize,

    /// Maximum number of `<url>` entries per sitemap file
    #[serde(rename = "links-per-file")]
    pub links_per_file: usize,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// How many times a throttled or unreachable URL is re-queued
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            threads: 3,
            total_link_limit: 1000,
            links_per_file: 50_000,
            max_redirects: 10,
            max_retries: 3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Timing configuration, all values in seconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimeoutConfig {
    /// Per-request timeout
    pub request: u64,

    /// Delay before each dispatch
    pub sleep: f64,

    /// Added to `sleep` every time the server throttles us (429/503)
    #[serde(rename = "backoff-step")]
    pub backoff_step: f64,

    /// How long dispatch is suspended after a throttled batch
    pub cooldown: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request: 20,
            sleep: 0.0,
            backoff_step: 0.5,
            cooldown: 300,
        }
    }
}

/// Link and content exclusion rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Glob-style (`*`, `?`) patterns matched against discovered links
    #[serde(rename = "exclude-patterns")]
    pub exclude_patterns: Vec<String>,

    /// Glob-style patterns matched case-insensitively against page bodies
    #[serde(rename = "content-exclude-patterns")]
    pub content_exclude_patterns: Vec<String>,

    /// File extensions (without the dot) that are never crawled
    #[serde(rename = "exclude-extensions")]
    pub exclude_extensions: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            content_exclude_patterns: Vec::new(),
            exclude_extensions: DEFAULT_EXCLUDE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Which link store backend to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
}

/// Link store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: StoreBackend,

    /// Directory holding one SQLite database per crawled site
    pub directory: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            directory: PathBuf::from("."),
        }
    }
}

/// Progress callback configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressConfig {
    /// Invoke the callback every `frequency` scanned URLs
    pub frequency: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { frequency: 10 }
    }
}

/// Raw page download configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadConfig {
    /// Directory receiving `{urlencoded url}.tmp.html` files
    pub directory: PathBuf,
}
