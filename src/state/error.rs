//! Per-URL error log entries
//!
//! Failures recorded here never abort the crawl; they are collected on the
//! session and reported once it finishes.

use std::fmt;

/// Classification of a recorded crawl failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The URL could not be turned into a request
    InvalidUrl,

    /// No HTTP status was received (connection refused, timeout, DNS)
    TransportFailure,

    /// The server answered 429 or 503
    RateLimited,

    /// Any other non-200 status
    HttpError,

    /// The redirect chain exceeded the configured hop limit
    TooManyRedirects,

    /// The link store failed
    StoreError,

    /// A local file could not be written
    IoError,
}

impl ErrorCode {
    /// Returns true if the failed URL is put back on the queue
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportFailure | Self::RateLimited)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::TransportFailure => "transport_failure",
            Self::RateLimited => "rate_limited",
            Self::HttpError => "http_error",
            Self::TooManyRedirects => "too_many_redirects",
            Self::StoreError => "store_error",
            Self::IoError => "io_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A failure recorded against one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlError {
    pub code: ErrorCode,
    pub message: String,
    pub source_url: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
}

impl CrawlError {
    pub fn new(code: ErrorCode, source_url: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_url: source_url.to_string(),
            status: None,
        }
    }

    /// Creates an error for a non-200 HTTP status
    ///
    /// 429 and 503 are classified as [`ErrorCode::RateLimited`], everything
    /// else as [`ErrorCode::HttpError`].
    pub fn from_status(source_url: &str, status: u16) -> Self {
        let code = if is_throttle_status(status) {
            ErrorCode::RateLimited
        } else {
            ErrorCode::HttpError
        };
        Self {
            code,
            message: format!("HTTP status {}", status),
            source_url: source_url.to_string(),
            status: Some(status),
        }
    }
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.source_url, self.message)
    }
}

/// Statuses a server uses to ask us to slow down
fn is_throttle_status(status: u16) -> bool {
    matches!(status, 429 | 503)
}
