//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from robots.txt to sitemap files.

use sitemap_crawler::config::{StorageConfig, StoreBackend};
use sitemap_crawler::storage::open_store;
use sitemap_crawler::{
    CrawlPolicy, Crawler, ErrorCode, LinkStore, MemoryLinkStore, SiteAddress,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Policy with backoff pauses short enough for tests
fn test_policy() -> CrawlPolicy {
    CrawlPolicy {
        backoff_cooldown: Duration::ZERO,
        backoff_step: Duration::from_millis(10),
        ..CrawlPolicy::default()
    }
}

/// Builds an HTML page with optional robots directives and the given links
fn html(robots: Option<&str>, links: &[&str]) -> String {
    let meta = robots
        .map(|r| format!(r#"<meta name="robots" content="{}">"#, r))
        .unwrap_or_default();
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">link</a>"#, l))
        .collect();
    format!("<html><head><title>Test</title>{}</head><body>{}</body></html>", meta, anchors)
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn crawler_for(server: &MockServer, policy: CrawlPolicy) -> Crawler {
    let site = SiteAddress::parse(&server.uri()).expect("Failed to parse mock server URL");
    Crawler::new(site, policy, Arc::new(MemoryLinkStore::new())).expect("Failed to build crawler")
}

fn stored_links(crawler: &Crawler) -> BTreeSet<String> {
    crawler
        .links()
        .expect("Failed to load links")
        .into_iter()
        .map(|record| record.link)
        .collect()
}

fn expected(server: &MockServer, paths: &[&str]) -> BTreeSet<String> {
    paths
        .iter()
        .map(|p| format!("{}{}", server.uri(), p))
        .collect()
}

#[tokio::test]
async fn test_full_crawl_skips_mailto_links() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(None, &["/page1", "/page2", "mailto:hello@example.test"]),
    )
    .await;
    mount_page(&server, "/page1", html(None, &[])).await;
    mount_page(&server, "/page2", html(None, &[])).await;

    let mut crawler = crawler_for(&server, test_policy());
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(
        stored_links(&crawler),
        expected(&server, &["/", "/page1", "/page2"])
    );
    assert_eq!(report.stored, 3);
    assert_eq!(report.errors, 0);

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests
        .iter()
        .all(|r| !r.url.as_str().contains("mailto")));
}

#[tokio::test]
async fn test_absolute_links_to_other_hosts_are_ignored() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(None, &["http://elsewhere.test/page", "/local"]),
    )
    .await;
    mount_page(&server, "/local", html(None, &[])).await;

    let mut crawler = crawler_for(&server, test_policy());
    crawler.crawl().await.expect("Crawl failed");

    assert_eq!(stored_links(&crawler), expected(&server, &["/", "/local"]));
}

#[tokio::test]
async fn test_noindex_and_nofollow_directives() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(None, &["/hidden", "/closed"])).await;
    mount_page(&server, "/hidden", html(Some("noindex"), &["/behind-hidden"])).await;
    mount_page(&server, "/behind-hidden", html(None, &[])).await;
    mount_page(&server, "/closed", html(Some("nofollow"), &["/behind-closed"])).await;

    Mock::given(method("GET"))
        .and(path("/behind-closed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(None, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut crawler = crawler_for(&server, test_policy());
    crawler.crawl().await.expect("Crawl failed");

    assert_eq!(
        stored_links(&crawler),
        expected(&server, &["/", "/closed", "/behind-hidden"])
    );
}

#[tokio::test]
async fn test_robots_disallow_rules_are_honored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: googlebot\nDisallow: /\n\nUser-agent: *\nDisallow: /admin\n",
        ))
        .mount(&server)
        .await;
    mount_page(&server, "/", html(None, &["/admin/users", "/about"])).await;
    mount_page(&server, "/about", html(None, &[])).await;

    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(None, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let mut crawler = crawler_for(&server, test_policy());
    crawler.crawl().await.expect("Crawl failed");

    assert_eq!(stored_links(&crawler), expected(&server, &["/", "/about"]));
    assert!(!crawler.check_link("/admin/settings"));
}

#[tokio::test]
async fn test_max_depth_is_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(None, &["/level1"])).await;
    mount_page(&server, "/level1", html(None, &["/level1/level2"])).await;
    mount_page(&server, "/level1/level2", html(None, &["/level1/level2/level3"])).await;

    Mock::given(method("GET"))
        .and(path("/level1/level2/level3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(None, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let policy = CrawlPolicy {
        max_depth: 2,
        ..test_policy()
    };
    let mut crawler = crawler_for(&server, policy);
    crawler.crawl().await.expect("Crawl failed");

    assert_eq!(
        stored_links(&crawler),
        expected(&server, &["/", "/level1", "/level1/level2"])
    );
}

#[tokio::test]
async fn test_total_link_limit() {
    let server = MockServer::start().await;
    let paths: Vec<String> = (1..=6).map(|i| format!("/page{}", i)).collect();
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    mount_page(&server, "/", html(None, &refs)).await;
    for p in &paths {
        mount_page(&server, p, html(None, &[])).await;
    }

    let policy = CrawlPolicy {
        total_link_limit: 3,
        ..test_policy()
    };
    let mut crawler = crawler_for(&server, policy);
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(crawler.links_added().unwrap(), 3);
    assert_eq!(report.stored, 3);
}

#[tokio::test]
async fn test_service_unavailable_triggers_backoff_and_retry() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(None, &["/busy", "/calm"])).await;
    mount_page(&server, "/calm", html(None, &[])).await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(&server, "/busy", html(None, &[])).await;

    let policy = CrawlPolicy {
        threads_limit: 3,
        ..test_policy()
    };
    let mut crawler = crawler_for(&server, policy);
    let report = crawler.crawl().await.expect("Crawl failed");

    assert_eq!(crawler.policy().threads_limit, 2);
    assert_eq!(crawler.policy().sleep, Duration::from_millis(10));
    assert_eq!(report.threads_limit, 2);
    assert_eq!(crawler.errors().len(), 1);
    assert_eq!(crawler.errors()[0].code, ErrorCode::RateLimited);
    assert_eq!(
        stored_links(&crawler),
        expected(&server, &["/", "/busy", "/calm"])
    );
}

#[tokio::test]
async fn test_rescan_matches_fresh_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(None, &["/a", "/b"])).await;
    mount_page(&server, "/a", html(None, &["/b", "/c"])).await;
    mount_page(&server, "/b", html(None, &[])).await;
    mount_page(&server, "/c", html(None, &["/"])).await;

    let mut crawler = crawler_for(&server, test_policy());
    crawler.crawl().await.expect("Crawl failed");
    let first = stored_links(&crawler);

    // A second crawl is a no-op because the scan is already stored
    let repeat = crawler.crawl().await.expect("Crawl failed");
    assert_eq!(repeat.scanned, 0);

    crawler.rescan().await.expect("Rescan failed");
    let second = stored_links(&crawler);

    assert_eq!(first, second);
    assert_eq!(first, expected(&server, &["/", "/a", "/b", "/c"]));
}

#[tokio::test]
async fn test_sitemap_chunks_and_index() {
    let server = MockServer::start().await;
    let paths: Vec<String> = (1..=4).map(|i| format!("/item{}", i)).collect();
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    mount_page(&server, "/", html(None, &refs)).await;
    for p in &paths {
        mount_page(&server, p, html(None, &[])).await;
    }

    let policy = CrawlPolicy {
        links_per_file: 2,
        ..test_policy()
    };
    let mut crawler = crawler_for(&server, policy);
    crawler.crawl().await.expect("Crawl failed");

    let dest = TempDir::new().expect("Failed to create temp dir");
    let output = crawler.save_xml(dest.path()).expect("Sitemap write failed");

    assert_eq!(output.sitemaps.len(), 3);
    for n in 1..=3 {
        assert!(dest.path().join(format!("sitemap_{}.xml", n)).exists());
    }

    let index_path = output.index.expect("Index should be written");
    let index = std::fs::read_to_string(index_path).expect("Failed to read index");
    assert!(index.contains(&format!("<loc>{}/sitemap_3.xml</loc>", server.uri())));
    assert!(index.contains("<lastmod>"));

    let first = std::fs::read_to_string(&output.sitemaps[0]).expect("Failed to read sitemap");
    assert!(first.contains("<changefreq>monthly</changefreq>"));
    assert_eq!(first.matches("<url>").count(), 2);
}

#[tokio::test]
async fn test_single_sitemap_has_no_index() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html(None, &[]))
                .insert_header("last-modified", "Mon, 01 Jan 2024 12:00:00 GMT"),
        )
        .mount(&server)
        .await;

    let mut crawler = crawler_for(&server, test_policy());
    crawler.crawl().await.expect("Crawl failed");

    let dest = TempDir::new().expect("Failed to create temp dir");
    let output = crawler.save_xml(dest.path()).expect("Sitemap write failed");

    assert_eq!(output.sitemaps, vec![dest.path().join("sitemap.xml")]);
    assert!(output.index.is_none());

    let sitemap = std::fs::read_to_string(&output.sitemaps[0]).expect("Failed to read sitemap");
    assert!(sitemap.contains("<lastmod>2024-01-01T12:00:00+00:00</lastmod>"));
}

#[tokio::test]
async fn test_sqlite_store_persists_scan_between_runs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(None, &["/a"])))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/a", html(None, &[])).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage = StorageConfig {
        backend: StoreBackend::Sqlite,
        directory: dir.path().to_path_buf(),
    };
    let site = SiteAddress::parse(&server.uri()).expect("Failed to parse mock server URL");

    {
        let store = open_store(&storage, site.site_key()).expect("Failed to open store");
        let mut crawler =
            Crawler::new(site.clone(), test_policy(), store).expect("Failed to build crawler");
        crawler.crawl().await.expect("Crawl failed");
        assert_eq!(crawler.links_added().unwrap(), 2);
    }

    // Reopening the database finds the completed scan, so nothing is fetched
    let store = open_store(&storage, site.site_key()).expect("Failed to reopen store");
    assert!(store.has_scan(site.site_key()).unwrap());

    let mut crawler = Crawler::new(site, test_policy(), store).expect("Failed to build crawler");
    let report = crawler.crawl().await.expect("Crawl failed");
    assert_eq!(report.stored, 2);
}
