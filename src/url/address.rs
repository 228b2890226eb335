use crate::UrlError;
use url::Url;

/// The root address of a crawl session
///
/// Parsed once from the user supplied URL and never mutated afterwards. All
/// links discovered during the crawl are re-rooted at this address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteAddress {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
    raw_url: String,
}

impl SiteAddress {
    /// Parses a root URL into a site address
    ///
    /// # Arguments
    ///
    /// * `raw` - The URL the crawl starts from
    ///
    /// # Returns
    ///
    /// * `Ok(SiteAddress)` - The parsed address
    /// * `Err(UrlError)` - The URL is malformed, has no host, or is not http(s)
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_crawler::url::SiteAddress;
    ///
    /// let site = SiteAddress::parse("https://example.test/blog/").unwrap();
    /// assert_eq!(site.host(), "example.test");
    /// assert_eq!(site.uri(), "blog");
    /// assert_eq!(site.site_key(), "https://example.test/blog");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let trimmed = raw.trim();
        let url = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

        let scheme = url.scheme().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                scheme
            )));
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
            _ => return Err(UrlError::MissingHost(trimmed.to_string())),
        };

        Ok(Self {
            scheme,
            host,
            port: url.port(),
            path: url.path().trim_matches('/').to_string(),
            query: url.query().unwrap_or_default().to_string(),
            fragment: url.fragment().unwrap_or_default().to_string(),
            raw_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, `None` when the URL used the scheme's default
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Path without leading or trailing slashes
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// `host[:port]`, used for every same-site comparison
    pub fn authority(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// `scheme://authority`, without a trailing slash
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority())
    }

    /// The root URL as given, with trailing slashes trimmed
    ///
    /// This is the key under which the link store groups a site's records.
    pub fn site_key(&self) -> &str {
        &self.raw_url
    }

    /// Path, query and fragment suffix of the root URL
    ///
    /// A non-empty value restricts the crawl to links containing it.
    pub fn uri(&self) -> String {
        let mut uri = self.path.clone();
        if !self.query.is_empty() {
            uri.push('?');
            uri.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            uri.push('#');
            uri.push_str(&self.fragment);
        }
        uri
    }

    /// Location of the site's robots.txt, always at the site root
    pub fn robots_url(&self) -> String {
        format!("{}/robots.txt", self.origin())
    }

    /// Whether `authority` (`host[:port]`) names this site
    pub fn is_same_authority(&self, authority: &str) -> bool {
        authority.eq_ignore_ascii_case(&self.authority())
    }
}
