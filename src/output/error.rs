//! Output error types and results

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing sitemap files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Do not have permissions to write {0}")]
    NotWritable(PathBuf),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OutputError {
    fn from(error: quick_xml::Error) -> Self {
        OutputError::Xml(error.to_string())
    }
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Files produced by one sitemap write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapOutput {
    /// Sitemap files, in chunk order
    pub sitemaps: Vec<PathBuf>,
    /// Index file, written only when there is more than one sitemap
    pub index: Option<PathBuf>,
}

impl SitemapOutput {
    /// Total number of files written
    pub fn file_count(&self) -> usize {
        self.sitemaps.len() + usize::from(self.index.is_some())
    }
}
