//! Robots.txt parser implementation
//!
//! Only the group addressed to every agent (`User-agent: *`) is read, and only
//! its `Disallow` rules are kept. They become exclusion patterns for the link
//! filter.

use robotstxt::{parse_robotstxt, RobotsParseHandler};

/// Disallow rules of the `User-agent: *` group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRobots {
    disallow: Vec<String>,
}

impl ParsedRobots {
    /// Parses raw robots.txt content
    ///
    /// The group starts at the first `User-agent: *` line and runs until the
    /// next `User-agent:` line or the end of the file. Empty `Disallow:`
    /// values allow everything and are dropped.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_crawler::robots::ParsedRobots;
    ///
    /// let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin\n");
    /// assert_eq!(robots.disallow(), ["/admin"]);
    /// ```
    pub fn from_content(content: &str) -> Self {
        let mut collector = WildcardGroup::default();
        parse_robotstxt(content, &mut collector);

        Self {
            disallow: collector.disallow,
        }
    }

    /// Creates rules that exclude nothing
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn disallow(&self) -> &[String] {
        &self.disallow
    }

    pub fn is_empty(&self) -> bool {
        self.disallow.is_empty()
    }
}

/// Collects the `Disallow` values of the first `User-agent: *` group
#[derive(Default)]
struct WildcardGroup {
    disallow: Vec<String>,
    in_group: bool,
    done: bool,
}

impl RobotsParseHandler for WildcardGroup {
    fn handle_robots_start(&mut self) {}

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, user_agent: &str) {
        if self.in_group {
            self.in_group = false;
            self.done = true;
        } else if !self.done && user_agent.trim() == "*" {
            self.in_group = true;
        }
    }

    fn handle_allow(&mut self, _line_num: u32, _value: &str) {}

    fn handle_disallow(&mut self, _line_num: u32, value: &str) {
        let value = value.trim();
        if self.in_group && !value.is_empty() {
            self.disallow.push(value.to_string());
        }
    }

    fn handle_sitemap(&mut self, _line_num: u32, _value: &str) {}

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_group_disallows() {
        let content = r#"
User-agent: *
Disallow: /admin
Disallow: /tmp/
Allow: /public
"#;

        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.disallow(), ["/admin", "/tmp/"]);
    }

    #[test]
    fn test_group_ends_at_next_user_agent() {
        let content = r#"
User-agent: *
Disallow: /private

User-agent: Googlebot
Disallow: /google-only
"#;

        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.disallow(), ["/private"]);
    }

    #[test]
    fn test_other_agents_are_ignored() {
        let content = r#"
User-agent: BadBot
Disallow: /

User-agent: *
Disallow: /cart
"#;

        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.disallow(), ["/cart"]);
    }

    #[test]
    fn test_case_insensitive_directives_and_comments() {
        let content = "USER-AGENT: *  # everyone\ndisallow: /search # no search\nDISALLOW:/checkout\n";

        let robots = ParsedRobots::from_content(content);
        assert_eq!(robots.disallow(), ["/search", "/checkout"]);
    }

    #[test]
    fn test_empty_disallow_is_dropped() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow:\n");
        assert!(robots.is_empty());
    }

    #[test]
    fn test_no_wildcard_group() {
        let robots = ParsedRobots::from_content("User-agent: Googlebot\nDisallow: /x\n");
        assert!(robots.is_empty());
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let robots = ParsedRobots::from_content("\u{feff}User-agent: *\nDisallow: /private\n");
        assert_eq!(robots.disallow(), ["/private"]);
    }

    #[test]
    fn test_misspelled_disallow_is_accepted() {
        let robots = ParsedRobots::from_content("User-agent: *\nDissallow: /old\n");
        assert_eq!(robots.disallow(), ["/old"]);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(ParsedRobots::from_content(""), ParsedRobots::allow_all());
    }
}
