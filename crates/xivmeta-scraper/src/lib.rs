pub mod acquire;
pub mod assemble;
pub mod browser;
pub mod error;
pub mod extract;
pub mod http_browser;
pub mod url;

pub use acquire::{acquire, Acquisition, ScrapeSettings};
pub use assemble::{assemble, iso_timestamp, scrape};
pub use browser::{Browser, BrowserLauncher, BrowserPage};
pub use error::ScraperError;
pub use extract::{extract_page_label, extract_rows};
pub use http_browser::HttpLauncher;
pub use url::statistics_url;
