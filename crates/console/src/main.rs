//! `learnhub` -- command-line client for the learning platform.
//!
//! # Environment variables
//!
//! | Variable                        | Default                     | Description                      |
//! |---------------------------------|-----------------------------|----------------------------------|
//! | `LEARNHUB_API_URL`              | `http://localhost:8000/api` | REST API base URL                |
//! | `LEARNHUB_REQUEST_TIMEOUT_SECS` | `30`                        | Per-request timeout              |
//! | `LEARNHUB_STORE_PATH`           | `.learnhub/store.json`      | Persisted local store            |
//! | `LEARNHUB_LIVE_URL`             | --                          | WebSocket invalidation channel   |
//! | `LEARNHUB_JOIN_TIMEOUT_SECS`    | `10`                        | Practice join deadline           |
//! | `LOG_FORMAT`                    | `text`                      | `json` for structured log lines  |

use clap::Parser;
use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use learnhub_client::ClientConfig;
use learnhub_console::cli::Cli;
use learnhub_console::commands;
use learnhub_views::AppContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    // --- Configuration ---
    let config = ClientConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, live = config.live_url.is_some(), "Loaded client configuration");

    // --- Context ---
    let ctx = AppContext::from_config(config).await?;

    let printer = tokio::spawn(commands::print_notifications(
        ctx.notifications.subscribe(),
        ctx.shutdown_token().clone(),
    ));
    let live = ctx.start_live_channel();

    let signal_ctx = ctx.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_ctx.shutdown();
    });

    let result = commands::run(&ctx, cli.command).await;

    // --- Shutdown ---
    ctx.shutdown();
    if let Some(handle) = live {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Live channel task failed");
        }
    }
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Notification printer failed");
    }

    result
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "learnhub_console=info,learnhub_views=info,learnhub_query=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
