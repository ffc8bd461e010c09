use tokio_util::sync::CancellationToken;

use watch_common::config::{AppConfig, log_dir_from_env};
use watch_common::logging::init_tracing;
use watch_engine::PollEngine;
use watch_fetcher::{ReqwestTransport, StatusFetcher};
use watch_notifier::{Notifier, TelegramTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing first so configuration errors are logged;
    // the guard flushes the log file on exit
    let log_dir = log_dir_from_env();
    let _log_guard = match init_tracing(log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            init_tracing(None)?;
            tracing::error!(error = %e, "Cannot open log directory, logging to console only");
            None
        }
    };

    tracing::info!("Review status bot starting...");

    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // One-time startup precondition
    let credentials = match config.credentials.require() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(error = %e, "Cannot start without credentials");
            return Err(e.into());
        }
    };

    let fetcher = StatusFetcher::new(
        ReqwestTransport::new(config.http_timeout())?,
        config.status_endpoint.clone(),
        credentials.practicum_token.clone(),
    );
    let notifier = Notifier::new(
        TelegramTransport::new(credentials.telegram_token.clone(), config.http_timeout())?
            .with_api_base(config.telegram_api_base.clone()),
        credentials.telegram_chat_id.clone(),
    );

    let start_cursor = chrono::Utc::now().timestamp();
    let mut engine = PollEngine::new(fetcher, notifier, config.retry_interval(), start_cursor);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Received shutdown signal, stopping gracefully...");
        shutdown.cancel();
    });

    engine.run(cancel).await;

    tracing::info!("Review status bot stopped.");
    Ok(())
}
