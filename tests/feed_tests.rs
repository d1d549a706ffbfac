use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use feed_digest::errors::FeedDigestError;
use feed_digest::feed::FeedWindowFilter;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example blog</title>
    <link>https://example.com/</link>
    <description>posts</description>
    <item>
      <title>Newest</title>
      <link>https://example.com/newest</link>
      <description>Body E</description>
      <pubDate>Mon, 01 Jan 2024 02:59:00 +0000</pubDate>
    </item>
    <item>
      <title>Just inside</title>
      <link>https://example.com/inside</link>
      <description>Body A</description>
      <pubDate>Mon, 01 Jan 2024 02:30:01 +0000</pubDate>
    </item>
    <item>
      <title>On the boundary</title>
      <link>https://example.com/boundary</link>
      <description>Body C</description>
      <pubDate>Mon, 01 Jan 2024 02:00:00 +0000</pubDate>
    </item>
    <item>
      <title>Too old</title>
      <link>https://example.com/old</link>
      <description>Body B</description>
      <pubDate>Mon, 01 Jan 2024 01:30:00 +0000</pubDate>
    </item>
    <item>
      <title>Undated</title>
      <link>https://example.com/undated</link>
      <description>Body D</description>
    </item>
  </channel>
</rss>"#;

const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom example</title>
  <id>urn:example:feed</id>
  <updated>2024-01-01T11:45:00+09:00</updated>
  <entry>
    <title>Atom inside</title>
    <id>urn:example:1</id>
    <link href="https://example.com/atom-inside"/>
    <updated>2024-01-01T11:45:00+09:00</updated>
    <summary>Atom body</summary>
  </entry>
  <entry>
    <title>Atom outside</title>
    <id>urn:example:2</id>
    <link href="https://example.com/atom-outside"/>
    <updated>2024-01-01T10:30:00+09:00</updated>
    <summary>Old atom body</summary>
  </entry>
</feed>"#;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

fn reference_now() -> DateTime<FixedOffset> {
    jst().with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

async fn serve(body: &str, content_type: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), content_type),
        )
        .mount(&server)
        .await;
    server
}

fn feed_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}/feed", server.uri())).unwrap()
}

#[tokio::test]
async fn test_rss_window_selection_keeps_feed_order() {
    let server = serve(RSS, "application/rss+xml").await;
    let filter = FeedWindowFilter::new(jst()).unwrap();

    let entries = filter
        .select_recent(&feed_url(&server), reference_now(), Duration::hours(1))
        .await
        .unwrap();

    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Newest", "Just inside"]);
    assert_eq!(entries[1].link, "https://example.com/inside");
    assert_eq!(entries[1].summary_text, "Body A");
    assert_eq!(entries[1].updated_at.to_rfc3339(), "2024-01-01T11:30:01+09:00");
}

#[tokio::test]
async fn test_atom_entries_use_updated_timestamp() {
    let server = serve(ATOM, "application/atom+xml").await;
    let filter = FeedWindowFilter::new(jst()).unwrap();

    let entries = filter
        .select_recent(&feed_url(&server), reference_now(), Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Atom inside");
    assert_eq!(entries[0].link, "https://example.com/atom-inside");
    assert_eq!(entries[0].summary_text, "Atom body");
}

#[tokio::test]
async fn test_wider_lookback_includes_older_entries() {
    let server = serve(RSS, "application/rss+xml").await;
    let filter = FeedWindowFilter::new(jst()).unwrap();

    let entries = filter
        .select_recent(&feed_url(&server), reference_now(), Duration::hours(2))
        .await
        .unwrap();

    // the undated entry stays excluded regardless of the window
    assert_eq!(entries.len(), 4);
    assert!(entries.iter().all(|e| e.title != "Undated"));
}

#[tokio::test]
async fn test_each_call_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RSS.as_bytes().to_vec(), "application/rss+xml"))
        .expect(2)
        .mount(&server)
        .await;
    let filter = FeedWindowFilter::new(jst()).unwrap();

    for _ in 0..2 {
        filter
            .select_recent(&feed_url(&server), reference_now(), Duration::hours(1))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_http_error_is_feed_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let filter = FeedWindowFilter::new(jst()).unwrap();

    let result = filter
        .select_recent(&feed_url(&server), reference_now(), Duration::hours(1))
        .await;

    assert!(matches!(result, Err(FeedDigestError::FeedFetch(_))));
}

#[tokio::test]
async fn test_malformed_feed_is_feed_fetch_error() {
    let server = serve("<html><body>maintenance</body>", "text/html").await;
    let filter = FeedWindowFilter::new(jst()).unwrap();

    let result = filter
        .select_recent(&feed_url(&server), reference_now(), Duration::hours(1))
        .await;

    assert!(matches!(result, Err(FeedDigestError::FeedFetch(_))));
}

#[tokio::test]
async fn test_unreachable_host_is_feed_fetch_error() {
    let filter = FeedWindowFilter::new(jst()).unwrap();
    let url = Url::parse("http://127.0.0.1:9/feed").unwrap();

    let result = filter
        .select_recent(&url, reference_now(), Duration::hours(1))
        .await;

    assert!(matches!(result, Err(FeedDigestError::FeedFetch(_))));
}

const ATOM_LINKS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom links</title>
  <id>urn:example:links</id>
  <updated>2024-01-01T11:45:00+09:00</updated>
  <entry>
    <title>Has comments</title>
    <id>urn:example:comments</id>
    <link rel="replies" href="https://example.com/post/comments.atom"/>
    <link rel="alternate" href="https://example.com/post"/>
    <updated>2024-01-01T11:45:00+09:00</updated>
    <summary>With replies</summary>
  </entry>
  <entry>
    <title>Content only</title>
    <id>urn:example:content</id>
    <link href="https://example.com/content-only"/>
    <updated>2024-01-01T11:40:00+09:00</updated>
    <content type="text">Full article body</content>
  </entry>
  <entry>
    <title>Linked by id</title>
    <id>https://example.com/by-id</id>
    <updated>2024-01-01T11:35:00+09:00</updated>
    <summary>No link element</summary>
  </entry>
  <entry>
    <title>Nowhere to link</title>
    <id>urn:example:linkless</id>
    <updated>2024-01-01T11:30:00+09:00</updated>
    <summary>Dropped</summary>
  </entry>
</feed>"#;

#[tokio::test]
async fn test_link_and_summary_fallbacks() {
    let server = serve(ATOM_LINKS, "application/atom+xml").await;
    let filter = FeedWindowFilter::new(jst()).unwrap();

    let entries = filter
        .select_recent(&feed_url(&server), reference_now(), Duration::hours(1))
        .await
        .unwrap();

    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Has comments", "Content only", "Linked by id"]);

    // alternate link wins over a replies link listed first
    assert_eq!(entries[0].link, "https://example.com/post");

    assert_eq!(entries[1].link, "https://example.com/content-only");
    assert_eq!(entries[1].summary_text, "Full article body");

    assert_eq!(entries[2].link, "https://example.com/by-id");
    assert_eq!(entries[2].summary_text, "No link element");
}
