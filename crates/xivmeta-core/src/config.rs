use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("XIVMETA_ENV", "development"));
    let bind_addr = parse_addr("XIVMETA_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("XIVMETA_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("XIVMETA_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("XIVMETA_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("XIVMETA_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let fflogs_base_url = or_default("XIVMETA_FFLOGS_BASE_URL", "https://www.fflogs.com")
        .trim_end_matches('/')
        .to_string();
    if fflogs_base_url.is_empty() {
        return Err(invalid(
            "XIVMETA_FFLOGS_BASE_URL",
            "base URL must not be empty".to_string(),
        ));
    }

    let scraper_user_agent = or_default(
        "XIVMETA_SCRAPER_USER_AGENT",
        "xivmeta/0.1 (raid-statistics)",
    );
    let scraper_navigation_timeout_secs =
        parse_u64("XIVMETA_SCRAPER_NAVIGATION_TIMEOUT_SECS", "20")?;
    let scraper_table_timeout_secs = parse_u64("XIVMETA_SCRAPER_TABLE_TIMEOUT_SECS", "10")?;
    let scraper_settle_delay_ms = parse_u64("XIVMETA_SCRAPER_SETTLE_DELAY_MS", "1000")?;
    let scraper_poll_interval_ms = parse_u64("XIVMETA_SCRAPER_POLL_INTERVAL_MS", "500")?;
    if scraper_poll_interval_ms == 0 {
        return Err(invalid(
            "XIVMETA_SCRAPER_POLL_INTERVAL_MS",
            "poll interval must be greater than zero".to_string(),
        ));
    }

    let rate_limit_max_requests = parse_usize("XIVMETA_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("XIVMETA_RATE_LIMIT_WINDOW_SECS", "60")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        fflogs_base_url,
        scraper_user_agent,
        scraper_navigation_timeout_secs,
        scraper_table_timeout_secs,
        scraper_settle_delay_ms,
        scraper_poll_interval_ms,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
