//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, select, visit and follow cycle end-to-end.

use site_crawler::config::{parse_config, CookieConfig, CrawlConfig};
use site_crawler::crawler::{crawl, Coordinator, RetryPolicy};
use site_crawler::output::{write_json, JsonCollector, PageRecord};
use site_crawler::CrawlError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawl configuration seeded at the mock server root
fn create_test_config(base_url: &str) -> CrawlConfig {
    let mut config = CrawlConfig::new(base_url);
    config.http_request_timeout_ms = 5_000;
    config.on_visit_page_timeout_ms = 10_000;
    config
}

fn coordinator(config: CrawlConfig) -> Coordinator {
    Coordinator::with_retry_policy(config, RetryPolicy::without_delay(3))
        .expect("Failed to create coordinator")
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn urls(collector: &JsonCollector) -> Vec<String> {
    collector.records().iter().map(|r| r.url.clone()).collect()
}

#[tokio::test]
async fn test_full_crawl_breadth_first() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        &mock_server,
        "/page1/",
        r#"<html><body>Content 1 <a href="/page3">Page 3</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/page2/",
        r#"<html><body>Content 2 <a href="/">Home</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/page3/",
        r#"<html><body>Content 3</body></html>"#.to_string(),
    )
    .await;

    let mut collector = JsonCollector::new();
    let stats = coordinator(create_test_config(&base_url))
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(
        urls(&collector),
        vec![
            base_url.clone(),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            format!("{}/page3", base_url),
        ]
    );
    assert!(collector.records()[1].content.contains("Content 1"));
    assert_eq!(stats.pages_visited, 4);
    assert_eq!(stats.links_discovered, 3);
    assert_eq!(stats.pages_remaining, 0);
}

#[tokio::test]
async fn test_page_budget_limits_visits() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/page1">1</a>"#.to_string()).await;
    mount_page(&mock_server, "/page1/", r#"<a href="/page2">2</a>"#.to_string()).await;
    mount_page(&mock_server, "/page2/", r#"<a href="/page3">3</a>"#.to_string()).await;
    mount_page(&mock_server, "/page3/", r#"<a href="/page4">4</a>"#.to_string()).await;

    let mut config = create_test_config(&base_url);
    config.max_pages_to_crawl = Some(3);

    let mut collector = JsonCollector::new();
    let stats = coordinator(config)
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(
        urls(&collector),
        vec![
            base_url.clone(),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );
    assert_eq!(stats.pages_remaining, 1);
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="https://elsewhere.example/page">Away</a>
               <a href="/local#section">Fragment</a>
               <a href="mailto:someone@example.com">Mail</a>
               <a href="http://localhost:{}/other">Other host</a>"#,
            other_server.address().port()
        ),
    )
    .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("other"))
        .expect(0)
        .mount(&other_server)
        .await;

    let mut collector = JsonCollector::new();
    let stats = coordinator(create_test_config(&base_url))
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(urls(&collector), vec![base_url]);
    assert_eq!(stats.links_discovered, 0);
}

#[tokio::test]
async fn test_cookie_header_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("cookie", "session=abc123;"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>members only</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.cookie = Some(CookieConfig {
        name: "session".to_string(),
        value: "abc123".to_string(),
    });

    let mut collector = JsonCollector::new();
    coordinator(config)
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(collector.len(), 1);
    assert_eq!(collector.records()[0].content, "<p>members only</p>");
}

#[tokio::test]
async fn test_not_found_is_retried_then_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/present">Present</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/present/", "<p>here</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(4)
        .mount(&mock_server)
        .await;

    let mut collector = JsonCollector::new();
    let stats = coordinator(create_test_config(&base_url))
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(
        urls(&collector),
        vec![base_url.clone(), format!("{}/present", base_url)]
    );
    assert_eq!(stats.pages_empty, 1);
}

#[tokio::test]
async fn test_server_error_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/fine">Fine</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/fine/", "<p>fine</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&mock_server)
        .await;

    let mut collector = JsonCollector::new();
    coordinator(create_test_config(&base_url))
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(
        urls(&collector),
        vec![base_url.clone(), format!("{}/fine", base_url)]
    );
}

#[tokio::test]
async fn test_selector_narrows_content_but_links_use_full_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><nav><a href="/about">About</a></nav><main><p>Welcome</p></main></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/about/",
        r#"<html><body><nav>menu</nav></body></html>"#.to_string(),
    )
    .await;

    let mut config = create_test_config(&base_url);
    config.page_selector = Some("main".to_string());

    let mut collector = JsonCollector::new();
    coordinator(config)
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    let records = collector.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].content, "<p>Welcome</p>");
    assert_eq!(records[1].url, format!("{}/about", base_url));
    assert_eq!(records[1].content, "");
}

#[tokio::test]
async fn test_visitor_failure_aborts_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">1</a><a href="/page2">2</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/page1/", "<p>one</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/page2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>two</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut seen = Vec::new();
    let mut visitor = |url: &str, _content: &str| -> anyhow::Result<()> {
        seen.push(url.to_string());
        if url.ends_with("/page1") {
            anyhow::bail!("disk full");
        }
        Ok(())
    };

    let result = coordinator(create_test_config(&base_url))
        .crawl(&mut visitor, &CancellationToken::new())
        .await;

    match result {
        Err(CrawlError::Callback { url, source }) => {
            assert_eq!(url, format!("{}/page1", base_url));
            assert_eq!(source.to_string(), "disk full");
        }
        other => panic!("expected callback error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(seen.len(), 2);
}

#[tokio::test]
async fn test_slow_page_times_out_and_crawl_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">Slow</a><a href="/quick">Quick</a>"#.to_string(),
    )
    .await;
    mount_page(&mock_server, "/quick/", "<p>quick</p>".to_string()).await;

    Mock::given(method("GET"))
        .and(path("/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/hidden">Hidden</a>"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.on_visit_page_timeout_ms = 300;

    let mut collector = JsonCollector::new();
    let stats = coordinator(config)
        .crawl(&mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(
        urls(&collector),
        vec![base_url.clone(), format!("{}/quick", base_url)]
    );
    assert_eq!(stats.pages_timed_out, 1);
}

#[tokio::test]
async fn test_cancelled_crawl_stops() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>slow</p>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let mut collector = JsonCollector::new();
    let result = coordinator(create_test_config(&base_url))
        .crawl(&mut collector, &cancel)
        .await;

    assert!(matches!(result, Err(CrawlError::Cancelled)));
    assert!(collector.is_empty());
}

#[tokio::test]
async fn test_crawl_from_toml_and_write_json() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body><article>Intro</article><a href="/guide">Guide</a></body></html>"#
            .to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/guide/",
        r#"<html><body><article>Guide text</article></body></html>"#.to_string(),
    )
    .await;

    let dir = tempfile::TempDir::new().unwrap();
    let output_path = dir.path().join("knowledge.json");

    let toml = format!(
        r#"
[crawler]
url = "{}"
max-pages-to-crawl = 10
http-request-timeout-ms = 5000
on-visit-page-timeout-ms = 10000
page-selector = "article"

[retry]
max-retries = 1
median-first-delay-ms = 0
max-delay-ms = 0

[output]
path = "{}"
pretty = false
"#,
        base_url,
        output_path.display()
    );
    let config = parse_config(&toml).expect("Failed to parse config");

    let mut collector = JsonCollector::with_page_budget(config.crawler.max_pages_to_crawl);
    crawl(&config, &mut collector, &CancellationToken::new())
        .await
        .expect("Crawl failed");

    write_json(
        collector.records(),
        std::path::Path::new(&config.output.path),
        config.output.pretty,
    )
    .expect("Failed to write output");

    let written: Vec<PageRecord> =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    let contents: Vec<&str> = written.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["Intro", "Guide text"]);
}
