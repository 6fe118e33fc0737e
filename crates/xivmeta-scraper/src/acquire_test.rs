use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use xivmeta_core::{JobRecord, Zone};

use super::{acquire, ScrapeSettings};
use crate::browser::{Browser, BrowserLauncher, BrowserPage};
use crate::error::ScraperError;

const PAGE: &str = r#"<html><body>
    <a class="zone-name">Futures Rewritten (Ultimate)</a>
    <table>
      <tr class="odd"><td>Dragoon</td><td>95.1</td><td>1</td><td>812</td></tr>
      <tr class="even"><td>Sage</td><td>90.4</td><td>2</td><td>640</td></tr>
    </table>
</body></html>"#;

#[derive(Default)]
struct Counters {
    launches: AtomicUsize,
    pages_opened: AtomicUsize,
    pages_closed: AtomicUsize,
    browsers_closed: AtomicUsize,
}

#[derive(Clone, Copy, Default)]
enum FailAt {
    #[default]
    Nowhere,
    Launch,
    NewPage,
    Goto,
    Wait,
}

struct FakeLauncher {
    counters: Arc<Counters>,
    fail_at: FailAt,
    fail_close: bool,
    goto_delay: Duration,
}

impl FakeLauncher {
    fn new(fail_at: FailAt) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            fail_at,
            fail_close: false,
            goto_delay: Duration::ZERO,
        }
    }

    fn count(&self, pick: impl Fn(&Counters) -> &AtomicUsize) -> usize {
        pick(&self.counters).load(Ordering::SeqCst)
    }
}

struct FakeBrowser {
    counters: Arc<Counters>,
    fail_at: FailAt,
    fail_close: bool,
    goto_delay: Duration,
}

struct FakePage {
    counters: Arc<Counters>,
    fail_at: FailAt,
    fail_close: bool,
    goto_delay: Duration,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>, ScraperError> {
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        if matches!(self.fail_at, FailAt::Launch) {
            return Err(ScraperError::Launch("no browser binary".to_string()));
        }
        Ok(Box::new(FakeBrowser {
            counters: Arc::clone(&self.counters),
            fail_at: self.fail_at,
            fail_close: self.fail_close,
            goto_delay: self.goto_delay,
        }))
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn new_page(&mut self) -> Result<Box<dyn BrowserPage>, ScraperError> {
        if matches!(self.fail_at, FailAt::NewPage) {
            return Err(ScraperError::Page("tab crashed".to_string()));
        }
        self.counters.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage {
            counters: Arc::clone(&self.counters),
            fail_at: self.fail_at,
            fail_close: self.fail_close,
            goto_delay: self.goto_delay,
        }))
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.counters.browsers_closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ScraperError::Page("browser already gone".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&mut self, url: &str) -> Result<(), ScraperError> {
        if !self.goto_delay.is_zero() {
            tokio::time::sleep(self.goto_delay).await;
        }
        if matches!(self.fail_at, FailAt::Goto) {
            return Err(ScraperError::Navigation {
                url: url.to_string(),
                reason: "connection reset".to_string(),
            });
        }
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        if matches!(self.fail_at, FailAt::Wait) {
            return Err(ScraperError::Timeout {
                selector: selector.to_string(),
                waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
        Ok(())
    }

    async fn content(&mut self) -> Result<String, ScraperError> {
        Ok(PAGE.to_string())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        self.counters.pages_closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ScraperError::Page("page already gone".to_string()));
        }
        Ok(())
    }
}

fn settings() -> ScrapeSettings {
    ScrapeSettings {
        base_url: "https://logs.test".to_string(),
        settle_delay: Duration::ZERO,
        table_timeout: Duration::from_millis(50),
        ..ScrapeSettings::default()
    }
}

#[tokio::test]
async fn success_extracts_rows_and_tears_down_once() {
    let launcher = FakeLauncher::new(FailAt::Nowhere);
    let acquisition = acquire(&launcher, &settings(), Zone::Ultimate, None)
        .await
        .expect("acquire");

    assert_eq!(
        acquisition.url,
        "https://logs.test/zone/statistics/65?class=Any&dataset=50"
    );
    assert_eq!(acquisition.label, "Futures Rewritten (Ultimate)");
    assert_eq!(
        acquisition.rows,
        vec![
            JobRecord::new("Dragoon", "95.1", "812"),
            JobRecord::new("Sage", "90.4", "640"),
        ]
    );
    assert_eq!(launcher.count(|c| &c.launches), 1);
    assert_eq!(launcher.count(|c| &c.pages_closed), 1);
    assert_eq!(launcher.count(|c| &c.browsers_closed), 1);
}

#[tokio::test]
async fn launch_failure_needs_no_teardown() {
    let launcher = FakeLauncher::new(FailAt::Launch);
    let err = acquire(&launcher, &settings(), Zone::Savage, Some(97))
        .await
        .expect_err("launch should fail");

    assert!(matches!(err, ScraperError::Launch(_)));
    assert_eq!(launcher.count(|c| &c.pages_closed), 0);
    assert_eq!(launcher.count(|c| &c.browsers_closed), 0);
}

#[tokio::test]
async fn page_open_failure_still_closes_browser() {
    let launcher = FakeLauncher::new(FailAt::NewPage);
    let err = acquire(&launcher, &settings(), Zone::Savage, None)
        .await
        .expect_err("page open should fail");

    assert!(matches!(err, ScraperError::Page(_)));
    assert_eq!(launcher.count(|c| &c.pages_opened), 0);
    assert_eq!(launcher.count(|c| &c.pages_closed), 0);
    assert_eq!(launcher.count(|c| &c.browsers_closed), 1);
}

#[tokio::test]
async fn navigation_failure_tears_down_once() {
    let launcher = FakeLauncher::new(FailAt::Goto);
    let err = acquire(&launcher, &settings(), Zone::Ultimate, None)
        .await
        .expect_err("goto should fail");

    assert!(matches!(err, ScraperError::Navigation { .. }));
    assert_eq!(launcher.count(|c| &c.pages_closed), 1);
    assert_eq!(launcher.count(|c| &c.browsers_closed), 1);
}

#[tokio::test]
async fn table_timeout_tears_down_once() {
    let launcher = FakeLauncher::new(FailAt::Wait);
    let err = acquire(&launcher, &settings(), Zone::Savage, Some(99))
        .await
        .expect_err("wait should time out");

    match err {
        ScraperError::Timeout { selector, waited_ms } => {
            assert_eq!(selector, "table");
            assert_eq!(waited_ms, 50);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(launcher.count(|c| &c.pages_closed), 1);
    assert_eq!(launcher.count(|c| &c.browsers_closed), 1);
}

#[tokio::test]
async fn slow_navigation_is_cut_off() {
    let mut launcher = FakeLauncher::new(FailAt::Nowhere);
    launcher.goto_delay = Duration::from_secs(5);
    let settings = ScrapeSettings {
        navigation_timeout: Duration::from_millis(20),
        ..settings()
    };

    let err = acquire(&launcher, &settings, Zone::Ultimate, None)
        .await
        .expect_err("navigation should time out");

    assert!(matches!(err, ScraperError::Navigation { .. }));
    assert_eq!(launcher.count(|c| &c.browsers_closed), 1);
}

#[tokio::test]
async fn close_errors_are_swallowed() {
    let mut launcher = FakeLauncher::new(FailAt::Nowhere);
    launcher.fail_close = true;

    let acquisition = acquire(&launcher, &settings(), Zone::Ultimate, None)
        .await
        .expect("close failures must not fail the acquisition");

    assert_eq!(acquisition.rows.len(), 2);
    assert_eq!(launcher.count(|c| &c.pages_closed), 1);
    assert_eq!(launcher.count(|c| &c.browsers_closed), 1);
}

#[tokio::test]
async fn close_errors_do_not_mask_original_failure() {
    let mut launcher = FakeLauncher::new(FailAt::Goto);
    launcher.fail_close = true;

    let err = acquire(&launcher, &settings(), Zone::Ultimate, None)
        .await
        .expect_err("goto should fail");

    assert!(matches!(err, ScraperError::Navigation { .. }));
}
