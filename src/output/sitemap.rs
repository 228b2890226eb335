//! Sitemap file writer
//!
//! Stored links are split into chunks of at most `links_per_file` entries and
//! each chunk becomes one `<urlset>` document. A single chunk is written as
//! `sitemap.xml`; several chunks become `sitemap_1.xml`, `sitemap_2.xml`, ...
//! plus a `sitemaps_index.xml` listing them.

use crate::output::error::{OutputError, OutputResult, SitemapOutput};
use crate::output::index::{render_index, INDEX_FILE_NAME};
use crate::storage::LinkRecord;
use crate::url::SiteAddress;
use chrono::Utc;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Namespace of the sitemap protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const CHANGE_FREQUENCY: &str = "monthly";
const PRIORITY: &str = "0.5";

/// Writes sitemap documents for a site
#[derive(Debug, Clone)]
pub struct SitemapWriter {
    origin: String,
    links_per_file: usize,
}

impl SitemapWriter {
    /// Creates a writer for a site
    ///
    /// # Arguments
    ///
    /// * `site` - The crawled site; its origin prefixes the index entries
    /// * `links_per_file` - Maximum `<url>` entries per sitemap file
    pub fn new(site: &SiteAddress, links_per_file: usize) -> Self {
        Self {
            origin: site.origin(),
            links_per_file: links_per_file.max(1),
        }
    }

    /// Writes the sitemap files for `links` into `dir`
    ///
    /// # Arguments
    ///
    /// * `links` - Records to publish, in order
    /// * `dir` - Existing output directory
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapOutput)` - Paths of the written files; empty for no links
    /// * `Err(OutputError)` - `dir` is not a directory, or a file could not be written
    pub fn write(&self, links: &[LinkRecord], dir: &Path) -> OutputResult<SitemapOutput> {
        if !dir.is_dir() {
            return Err(OutputError::NotADirectory(dir.to_path_buf()));
        }

        let chunks: Vec<&[LinkRecord]> = links.chunks(self.links_per_file).collect();
        let mut output = SitemapOutput::default();

        for (idx, chunk) in chunks.iter().enumerate() {
            let path = if chunks.len() == 1 {
                dir.join("sitemap.xml")
            } else {
                dir.join(format!("sitemap_{}.xml", idx + 1))
            };

            write_file(&path, &render_urlset(chunk)?)?;
            tracing::debug!("Wrote {} links to {}", chunk.len(), path.display());
            output.sitemaps.push(path);
        }

        if output.sitemaps.len() > 1 {
            let path = dir.join(INDEX_FILE_NAME);
            let index = render_index(&self.origin, output.sitemaps.len(), Utc::now())?;
            write_file(&path, &index)?;
            output.index = Some(path);
        }

        Ok(output)
    }
}

fn write_file(path: &PathBuf, contents: &[u8]) -> OutputResult<()> {
    if let Ok(metadata) = std::fs::metadata(path) {
        if metadata.permissions().readonly() {
            return Err(OutputError::NotWritable(path.clone()));
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}

/// Renders one `<urlset>` document
///
/// `<loc>` is the stored link verbatim; `<lastmod>` is written only when the
/// record has a modification time.
pub fn render_urlset(links: &[LinkRecord]) -> OutputResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)]),
    ))?;

    for record in links {
        writer.write_event(Event::Start(BytesStart::new("url")))?;

        write_text_element(&mut writer, "loc", &record.link)?;
        if let Some(modified) = record.last_modified.as_deref().filter(|m| !m.is_empty()) {
            write_text_element(&mut writer, "lastmod", modified)?;
        }
        write_text_element(&mut writer, "changefreq", CHANGE_FREQUENCY)?;
        write_text_element(&mut writer, "priority", PRIORITY)?;

        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    Ok(writer.into_inner().into_inner())
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> OutputResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
