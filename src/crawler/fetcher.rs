//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Following redirects up to the configured hop limit
//! - Classifying failures into transport errors and redirect overflows
//!
//! Every HTTP status, 4xx and 5xx included, comes back as a [`FetchResponse`];
//! deciding what a status means is left to the crawl engine.

use crate::config::CrawlPolicy;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::collections::HashMap;
use thiserror::Error;

/// A completed HTTP exchange
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers, names lowercased
    pub headers: HashMap<String, String>,
    /// Response body
    pub body: String,
}

impl FetchResponse {
    /// Looks up a header by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Failures that produced no HTTP status
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The URL could not be turned into a request
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection refused, DNS failure, timeout or an unreadable body
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The redirect chain exceeded the hop limit
    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),
}

/// HTTP transport used by the crawl engine
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Fetches a URL with GET
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResponse)` - The server answered, whatever the status
    /// * `Err(FetchError)` - No status was received
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// [`FetchClient`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from the crawl policy
    ///
    /// # Arguments
    ///
    /// * `policy` - Supplies the user agent, request timeout and redirect limit
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Successfully built HTTP client
    /// * `Err(reqwest::Error)` - Failed to build client
    pub fn new(policy: &CrawlPolicy) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(policy.user_agent.clone())
            .timeout(policy.request_timeout)
            .redirect(Policy::limited(policy.max_redirects))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchClient for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();

        let body = response.text().await.map_err(classify)?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}

/// Maps a reqwest error onto the fetch failure taxonomy
fn classify(error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        FetchError::InvalidUrl(error.to_string())
    } else if error.is_redirect() {
        FetchError::TooManyRedirects(error.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_policy() -> CrawlPolicy {
        CrawlPolicy {
            user_agent: "TestBot/1.0".to_string(),
            request_timeout: Duration::from_secs(5),
            max_redirects: 3,
            ..CrawlPolicy::default()
        }
    }

    #[tokio::test]
    async fn test_get_returns_body_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .and(header("user-agent", "TestBot/1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Last-Modified", "Tue, 15 Nov 1994 12:45:26 +0000")
                    .set_body_string("<html></html>"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_policy()).unwrap();
        let response = fetcher
            .get(&format!("{}/page", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "<html></html>");
        assert_eq!(
            response.header("last-modified"),
            Some("Tue, 15 Nov 1994 12:45:26 +0000")
        );
        assert_eq!(
            response.header("Last-Modified"),
            Some("Tue, 15 Nov 1994 12:45:26 +0000")
        );
    }

    #[tokio::test]
    async fn test_error_status_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_policy()).unwrap();
        let response = fetcher
            .get(&format!("{}/busy", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
    }

    #[tokio::test]
    async fn test_redirects_are_followed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", format!("{}/new", server.uri()).as_str()),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_policy()).unwrap();
        let response = fetcher
            .get(&format!("{}/old", server.uri()))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, "moved");
    }

    #[tokio::test]
    async fn test_redirect_loop_is_too_many_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/loop"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/loop", server.uri()).as_str()),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&test_policy()).unwrap();
        let result = fetcher.get(&format!("{}/loop", server.uri())).await;

        assert!(matches!(result, Err(FetchError::TooManyRedirects(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let fetcher = HttpFetcher::new(&test_policy()).unwrap();
        let result = fetcher.get(&format!("http://127.0.0.1:{}/", port)).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_invalid_url() {
        let fetcher = HttpFetcher::new(&test_policy()).unwrap();
        let result = fetcher.get("not a url").await;

        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
