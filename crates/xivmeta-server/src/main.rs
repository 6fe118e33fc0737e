mod api;
mod middleware;

use std::{sync::Arc, time::Duration};

use tracing_subscriber::EnvFilter;
use xivmeta_scraper::{HttpLauncher, ScrapeSettings};

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = xivmeta_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = xivmeta_db::PoolConfig::from_app_config(&config);
    let pool = xivmeta_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = xivmeta_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let scrape = ScrapeSettings::from_app_config(&config);
    let state = AppState {
        launcher: Arc::new(HttpLauncher::from_settings(&scrape)),
        store: Arc::new(pool),
        scrape: Arc::new(scrape),
    };
    let rate_limit = RateLimitState::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    let app = build_app(state, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "xivmeta-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
