//! End-to-end scrape tests for the HTTP browser backend.
//!
//! A local `wiremock` server stands in for the statistics site, so no real
//! network traffic is made.

use std::time::{Duration, Instant};

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xivmeta_core::{JobRecord, Zone};
use xivmeta_scraper::{scrape, HttpLauncher, ScrapeSettings, ScraperError};

const ZONE_PAGE: &str = r#"<html><body>
    <a class="zone-name">Futures Rewritten (Ultimate)</a>
    <table>
      <tr><th>Spec</th><th>Score</th><th>Rank</th><th>Parses</th></tr>
      <tr class="odd"><td>Dragoon</td><td>95.1</td><td>1</td><td>812</td></tr>
      <tr class="even"><td>Sage</td><td>90.4</td><td>2</td><td>640</td></tr>
      <tr class="odd"><td>Gunbreaker</td><td>88.0</td><td>3</td><td>501</td></tr>
    </table>
</body></html>"#;

const BOSS_PAGE: &str = r#"<html><body>
    <a class="zone-name">AAC Cruiserweight (Savage)</a>
    <div id="filter-boss-text">Brute Abombinator</div>
    <table>
      <tr class="odd"><td>Pictomancer</td><td>31,204</td><td>1</td><td>9,100</td></tr>
    </table>
</body></html>"#;

const LOADING_PAGE: &str = "<html><body><p>Loading statistics...</p></body></html>";

fn test_settings(base_url: String) -> ScrapeSettings {
    ScrapeSettings {
        base_url,
        user_agent: "xivmeta-test/0.1".to_string(),
        navigation_timeout: Duration::from_secs(5),
        table_timeout: Duration::from_millis(400),
        settle_delay: Duration::ZERO,
        poll_interval: Duration::from_millis(20),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

#[tokio::test]
async fn scrape_zone_groups_table_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/65"))
        .and(query_param("class", "Any"))
        .and(query_param("dataset", "50"))
        .respond_with(html(ZONE_PAGE))
        .mount(&server)
        .await;

    let settings = test_settings(server.uri());
    let launcher = HttpLauncher::from_settings(&settings);
    let result = scrape(&launcher, &settings, Zone::Ultimate, None)
        .await
        .expect("scrape should succeed");

    assert_eq!(result.zone, Some(65));
    assert_eq!(result.zone_name, "Futures Rewritten (Ultimate)");
    assert_eq!(
        result.url.as_deref(),
        Some(format!("{}/zone/statistics/65?class=Any&dataset=50", server.uri()).as_str())
    );
    assert_eq!(result.groups.melee, vec![JobRecord::new("Dragoon", "95.1", "812")]);
    assert_eq!(result.groups.healer, vec![JobRecord::new("Sage", "90.4", "640")]);
    assert_eq!(result.groups.tank, vec![JobRecord::new("Gunbreaker", "88.0", "501")]);
    assert!(result.groups.caster.is_empty());
    assert!(result.groups.ranged.is_empty());
}

#[tokio::test]
async fn scrape_boss_uses_boss_title_and_forwards_boss_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/68"))
        .and(query_param("boss", "97"))
        .respond_with(html(BOSS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let settings = test_settings(server.uri());
    let launcher = HttpLauncher::from_settings(&settings);
    let result = scrape(&launcher, &settings, Zone::Savage, Some(97))
        .await
        .expect("scrape should succeed");

    assert_eq!(result.zone_name, "Brute Abombinator");
    assert!(result.is_boss_specific());
    assert_eq!(
        result.groups.caster,
        vec![JobRecord::new("Pictomancer", "31,204", "9,100")]
    );
}

#[tokio::test]
async fn table_that_appears_on_a_later_fetch_is_picked_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/65"))
        .respond_with(html(LOADING_PAGE))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/65"))
        .respond_with(html(ZONE_PAGE))
        .mount(&server)
        .await;

    let settings = test_settings(server.uri());
    let launcher = HttpLauncher::from_settings(&settings);
    let result = scrape(&launcher, &settings, Zone::Ultimate, None)
        .await
        .expect("scrape should succeed after polling");

    assert_eq!(result.groups.len(), 3);
}

#[tokio::test]
async fn missing_table_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/68"))
        .respond_with(html(LOADING_PAGE))
        .mount(&server)
        .await;

    let settings = test_settings(server.uri());
    let launcher = HttpLauncher::from_settings(&settings);
    let err = scrape(&launcher, &settings, Zone::Savage, None)
        .await
        .expect_err("scrape should time out");

    match err {
        ScraperError::Timeout { selector, waited_ms } => {
            assert_eq!(selector, "table");
            assert_eq!(waited_ms, 400);
        }
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test]
async fn slow_refetch_does_not_outlast_table_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/68"))
        .respond_with(html(LOADING_PAGE))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/68"))
        .respond_with(html(BOSS_PAGE).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let settings = ScrapeSettings {
        table_timeout: Duration::from_millis(200),
        ..test_settings(server.uri())
    };
    let launcher = HttpLauncher::from_settings(&settings);
    let started = Instant::now();
    let err = scrape(&launcher, &settings, Zone::Savage, None)
        .await
        .expect_err("scrape should time out");

    assert!(
        started.elapsed() < Duration::from_secs(2),
        "table wait ran for {:?}",
        started.elapsed()
    );
    assert!(
        matches!(err, ScraperError::Timeout { waited_ms: 200, .. }),
        "expected Timeout, got: {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_reported_as_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/65"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let settings = test_settings(server.uri());
    let launcher = HttpLauncher::from_settings(&settings);
    let err = scrape(&launcher, &settings, Zone::Ultimate, None)
        .await
        .expect_err("scrape should fail");

    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 503, .. }),
        "expected UnexpectedStatus(503), got: {err:?}"
    );
}

#[tokio::test]
async fn empty_table_yields_empty_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zone/statistics/65"))
        .respond_with(html(
            "<html><a class=\"zone-name\">Empty</a><table><tr><th>Spec</th></tr></table></html>",
        ))
        .mount(&server)
        .await;

    let settings = test_settings(server.uri());
    let launcher = HttpLauncher::from_settings(&settings);
    let result = scrape(&launcher, &settings, Zone::Ultimate, None)
        .await
        .expect("scrape should succeed");

    assert!(result.groups.is_empty());
    assert_eq!(result.zone_name, "Empty");
}
