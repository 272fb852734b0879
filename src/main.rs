//! Clinic Timer backend server

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use clinic_timer::api::create_router;
use clinic_timer::config::Config;
use clinic_timer::database::DatabaseManager;
use clinic_timer::logging::{init_logging, log_startup};
use clinic_timer::services::{
    ClinicService, LogNotifier, Notifier, PeriodCalculator, SystemTimeProvider, WebhookNotifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    init_logging(&config.log_level, config.is_production());
    log_startup(&config.environment);
    config.log_config();

    config.ensure_data_dir()?;
    let database = DatabaseManager::new(&config.resolved_database_url())
        .await
        .context("failed to open database")?;
    database.migrate().await.context("failed to migrate database")?;

    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier),
    };

    let service = Arc::new(ClinicService::new(
        &database,
        config.categories.clone(),
        PeriodCalculator::new(config.timezone),
        notifier,
        Arc::new(SystemTimeProvider::new()),
    ));

    let interval = service.start_reminders().await?;
    info!("Reminders every {} minutes while timers run", interval);

    let app = create_router(Arc::clone(&service), &config);
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    info!("Clinic Timer listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.shutdown().await;
    database.close().await;
    info!("Clinic Timer shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
