use crate::url::SiteAddress;

/// Splits an absolute or protocol-relative link into `(authority, rest)`
///
/// Returns `None` for links without an explicit `http://`, `https://` or `//`
/// prefix. `rest` starts at the first `/`, `?` or `#` after the authority.
pub(crate) fn split_origin(link: &str) -> Option<(&str, &str)> {
    let after_scheme = strip_prefix_ignore_case(link, "http://")
        .or_else(|| strip_prefix_ignore_case(link, "https://"))
        .or_else(|| link.strip_prefix("//"))?;

    let end = after_scheme
        .find(['/', '?', '#'])
        .unwrap_or(after_scheme.len());
    Some(after_scheme.split_at(end))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if value.len() >= prefix.len()
        && value.is_char_boundary(prefix.len())
        && value[..prefix.len()].eq_ignore_ascii_case(prefix)
    {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

impl SiteAddress {
    /// Normalizes a discovered link into an absolute URL on this site
    ///
    /// # Normalization Steps
    ///
    /// 1. Strip a single leading `.` (so `./page` becomes `/page`)
    /// 2. Drop any `scheme://authority` or `//authority` prefix
    /// 3. Drop the fragment
    /// 4. Re-root the remainder at `scheme://authority/`
    ///
    /// Site-relative links are resolved against the site root, never against
    /// the page they were found on. Links to other hosts are expected to have
    /// been rejected by the link filter already; if one gets here its path is
    /// re-rooted on this site.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_crawler::url::SiteAddress;
    ///
    /// let site = SiteAddress::parse("http://example.test").unwrap();
    /// assert_eq!(site.normalize("/about"), "http://example.test/about");
    /// assert_eq!(site.normalize("./team#people"), "http://example.test/team");
    /// assert_eq!(site.normalize("http://example.test/a/b"), "http://example.test/a/b");
    /// ```
    pub fn normalize(&self, link: &str) -> String {
        let link = link.trim();
        let link = link.strip_prefix('.').unwrap_or(link);

        let rest = match split_origin(link) {
            Some((_, rest)) => rest,
            None => link,
        };

        let rest = match rest.find('#') {
            Some(idx) => &rest[..idx],
            None => rest,
        };

        format!("{}/{}", self.origin(), rest.trim_start_matches('/'))
    }

    /// Path depth of a URL relative to this site
    ///
    /// The origin and any leading or trailing slashes are removed and the
    /// remainder is split on `/`. The site root has depth 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_crawler::url::SiteAddress;
    ///
    /// let site = SiteAddress::parse("http://example.test").unwrap();
    /// assert_eq!(site.depth("http://example.test/"), 1);
    /// assert_eq!(site.depth("http://example.test/a"), 1);
    /// assert_eq!(site.depth("http://example.test/a/b/c/"), 3);
    /// ```
    pub fn depth(&self, url: &str) -> u32 {
        let rest = match split_origin(url) {
            Some((_, rest)) => rest,
            None => url,
        };

        rest.trim_matches('/').split('/').count() as u32
    }
}
