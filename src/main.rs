use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use civic_site::app::{build_router, AppState};
use civic_site::config::AppConfig;

/// Revalidation webhook, search and contact API for the site frontend.
#[derive(Debug, Parser)]
#[command(name = "civic-site", version, about)]
struct Args {
    /// Optional TOML configuration file. Environment variables take precedence.
    #[arg(long, env = "CIVIC_SITE_CONFIG", default_value = "civic-site.toml")]
    config: PathBuf,

    /// Override the bind address, e.g. `127.0.0.1:8080`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "civic_site=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(Some(&args.config)).context("Failed to load configuration")?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_addr))?;

    tracing::info!(
        project = %config.sanity_project_id,
        dataset = %config.sanity_dataset,
        "Starting civic-site..."
    );

    let state = AppState::from_config(config).context("Failed to initialize services")?;
    let app = build_router(state).context("Failed to build router")?;

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    // Peer addresses back the rate limiter when no proxy header is present.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
