//! Notice board server
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use noticeboard_ai::EnrichmentManager;
use noticeboard_core::config::AppConfig;
use noticeboard_core::error::AppError;
use noticeboard_database::StoreManager;
use noticeboard_service::{IngestionService, IngestionSettings, NoticeService};
use noticeboard_storage::UploadStorage;
use noticeboard_worker::{CronScheduler, FeederSupervisor, UploadSweep, build_feeders};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from an explicit file or the `config/` directory
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("NOTICEBOARD_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env =
                std::env::var("NOTICEBOARD_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting notice board v{}", env!("CARGO_PKG_VERSION"));
    let started_at = Instant::now();

    // ── Step 1: Notice store ─────────────────────────────────────
    tracing::info!(
        "Initializing notice store (provider: {})...",
        config.database.provider
    );
    let stores = StoreManager::new(&config.database).await?;
    let store = stores.store();

    // ── Step 2: Upload area ──────────────────────────────────────
    let uploads = Arc::new(UploadStorage::new(&config.uploads.directory).await?);
    tracing::info!("Upload directory: {}", uploads.root().display());

    // ── Step 3: Enrichment collaborators ─────────────────────────
    let enrichment = EnrichmentManager::new(&config.enrichment, &config.ocr)?;

    // ── Step 4: Services ─────────────────────────────────────────
    let ingestion = IngestionService::new(
        Arc::clone(&store),
        enrichment.summarizer(),
        enrichment.classifier(),
        enrichment.ocr(),
        Arc::clone(&uploads),
        IngestionSettings::from_config(&config.ingestion, &config.enrichment, &config.ocr),
    );
    let notices = NoticeService::new(Arc::clone(&store));

    // ── Step 5: Feeders ──────────────────────────────────────────
    let feeders = Arc::new(FeederSupervisor::new(
        build_feeders(&config.feeders)?,
        &config.feeders,
    ));
    if feeders.is_empty() {
        tracing::info!("No feeders enabled");
    } else {
        feeders.start(ingestion.clone()).await;
        tracing::info!("{} feeder(s) started", feeders.len());
    }

    // ── Step 6: Scheduled maintenance ────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new().await?;
        let sweep = Arc::new(UploadSweep::from_config(
            Arc::clone(&uploads),
            &config.uploads,
        ));
        scheduler
            .register_upload_sweep(sweep, &config.worker.upload_sweep_cron)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Scheduled maintenance disabled");
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let app_state = noticeboard_api::AppState {
        config: Arc::new(config.clone()),
        store,
        uploads,
        ingestion: Arc::new(ingestion),
        notices: Arc::new(notices),
        feeders: Arc::clone(&feeders),
        started_at,
    };

    let app = noticeboard_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Notice board listening on {}", addr);

    // ── Step 8: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let serving = async move {
        tokio::select! {
            result = server.into_future() => {
                result.map_err(|e| AppError::internal(format!("Server error: {}", e)))
            }
            _ = async {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!("Open connections did not drain within {}s", grace.as_secs());
                Ok(())
            }
        }
    };

    // ── Step 9: Stop background tasks ────────────────────────────
    let cleanup = async move {
        tracing::info!("Stopping background tasks...");
        feeders.stop().await;
        if let Some(scheduler) = scheduler.as_mut() {
            if let Err(e) = scheduler.shutdown().await {
                tracing::warn!("Scheduler shutdown failed: {}", e);
            }
        }
        stores.close().await;
    };

    serve_then_cleanup(serving, cleanup).await?;
    tracing::info!("Notice board shut down gracefully");
    Ok(())
}

/// Run the server to completion, then always run `cleanup`, even when
/// serving failed. The serving result is returned afterwards.
async fn serve_then_cleanup<S, C>(serving: S, cleanup: C) -> Result<(), AppError>
where
    S: Future<Output = Result<(), AppError>>,
    C: Future<Output = ()>,
{
    let served = serving.await;
    cleanup.await;
    served
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
