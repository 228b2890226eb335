//! Sitemap index document
//!
//! Written next to the sitemap files when a crawl produced more than one of
//! them, listing each file's public URL.

use crate::output::error::OutputResult;
use crate::output::sitemap::SITEMAP_NAMESPACE;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// File name of the index document
pub const INDEX_FILE_NAME: &str = "sitemaps_index.xml";

/// Public URL of the `number`-th (1-based) sitemap chunk
pub fn chunk_url(origin: &str, number: usize) -> String {
    format!("{}/sitemap_{}.xml", origin, number)
}

/// Renders a `<sitemapindex>` document for `count` chunks
///
/// # Arguments
///
/// * `origin` - `scheme://authority` of the crawled site
/// * `count` - Number of `sitemap_{n}.xml` files
/// * `written_at` - Timestamp used as every entry's `<lastmod>`
pub fn render_index(origin: &str, count: usize, written_at: DateTime<Utc>) -> OutputResult<Vec<u8>> {
    let lastmod = written_at.to_rfc3339_opts(SecondsFormat::Secs, false);
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("sitemapindex").with_attributes([("xmlns", SITEMAP_NAMESPACE)]),
    ))?;

    for number in 1..=count {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;

        writer.write_event(Event::Start(BytesStart::new("loc")))?;
        writer.write_event(Event::Text(BytesText::new(&chunk_url(origin, number))))?;
        writer.write_event(Event::End(BytesEnd::new("loc")))?;

        writer.write_event(Event::Start(BytesStart::new("lastmod")))?;
        writer.write_event(Event::Text(BytesText::new(&lastmod)))?;
        writer.write_event(Event::End(BytesEnd::new("lastmod")))?;

        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;

    Ok(writer.into_inner().into_inner())
}
