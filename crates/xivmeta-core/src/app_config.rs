use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub fflogs_base_url: String,
    pub scraper_user_agent: String,
    pub scraper_navigation_timeout_secs: u64,
    pub scraper_table_timeout_secs: u64,
    pub scraper_settle_delay_ms: u64,
    pub scraper_poll_interval_ms: u64,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("fflogs_base_url", &self.fflogs_base_url)
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_navigation_timeout_secs",
                &self.scraper_navigation_timeout_secs,
            )
            .field(
                "scraper_table_timeout_secs",
                &self.scraper_table_timeout_secs,
            )
            .field("scraper_settle_delay_ms", &self.scraper_settle_delay_ms)
            .field("scraper_poll_interval_ms", &self.scraper_poll_interval_ms)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
