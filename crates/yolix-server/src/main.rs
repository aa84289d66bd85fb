mod api;
mod cache;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use yolix_analysis::AnalysisClient;
use yolix_youtube::YoutubeClient;

use crate::{
    api::{build_app, AppState},
    cache::CommentCache,
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = yolix_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Both credentials are checked here so a misconfigured deployment never
    // starts accepting requests.
    let youtube = YoutubeClient::from_config(&config)?;
    let analysis = AnalysisClient::from_config(&config)?;

    let state = AppState {
        youtube: Arc::new(youtube),
        analysis: Arc::new(analysis),
        cache: Arc::new(CommentCache::new()),
    };
    let app = build_app(
        state,
        RateLimitState::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        model = %config.openrouter_model,
        "yolix server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
