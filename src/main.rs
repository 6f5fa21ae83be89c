//! Nubo Server — self-hosted cloud drive.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use nubo_core::config::AppConfig;
use nubo_core::error::AppError;
use nubo_core::traits::storage::BlobStore;

#[tokio::main]
async fn main() {
    let env = std::env::var("NUBO_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Configuration loaded (env: {env})");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
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
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Nubo v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Create data directories ──────────────────────────
    create_data_directories(&config).await?;

    // ── Step 2: Database connection + migrations ─────────────────
    let db = nubo_database::DatabasePool::connect(&config.database).await?;
    nubo_database::migration::run_migrations(db.pool()).await?;

    // ── Step 3: Blob store + URL signer ──────────────────────────
    tracing::info!(root = %config.storage.blob_root, "Initializing blob store");
    let blob_store: Arc<dyn BlobStore> =
        Arc::new(nubo_storage::local::LocalBlobStore::new(&config.storage.blob_root).await?);
    let signer = Arc::new(nubo_storage::sign::UrlSigner::new(
        &config.auth.jwt_secret,
        config.storage.signed_url_ttl_seconds,
    ));

    // ── Step 4: Repositories ─────────────────────────────────────
    let user_repo = Arc::new(nubo_database::repositories::user::UserRepository::new(
        db.pool().clone(),
    ));
    let session_repo = Arc::new(nubo_database::repositories::session::SessionRepository::new(
        db.pool().clone(),
    ));
    let folder_repo = Arc::new(nubo_database::repositories::folder::FolderRepository::new(
        db.pool().clone(),
    ));
    let file_repo = Arc::new(nubo_database::repositories::file::FileRepository::new(
        db.pool().clone(),
    ));

    // ── Step 5: Services ─────────────────────────────────────────
    let auth_service = Arc::new(nubo_service::auth::AuthService::new(
        Arc::clone(&user_repo),
        Arc::clone(&session_repo),
        &config.auth,
    ));
    let folder_service = Arc::new(nubo_service::folder::FolderService::new(Arc::clone(
        &folder_repo,
    )));
    let file_service = Arc::new(nubo_service::file::FileService::new(Arc::clone(&file_repo)));
    let blob_service = Arc::new(nubo_service::blob::BlobService::new(
        Arc::clone(&blob_store),
        signer,
        config.server.public_url.clone(),
    ));
    let usage_service = Arc::new(nubo_service::usage::UsageService::new(
        Arc::clone(&file_repo),
        config.quota.clone(),
    ));
    tracing::info!("Services initialized");

    // ── Step 6: Build and start HTTP server ──────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = nubo_api::AppState {
        config: Arc::new(config),
        db: db.clone(),
        blob_store,
        auth_service,
        folder_service,
        file_service,
        blob_service,
        usage_service,
    };
    let app = nubo_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Nubo server listening on {addr}");

    // ── Step 7: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    tracing::info!("Nubo server shut down gracefully");

    Ok(())
}

/// Create the directories the database and blob store live in.
async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    // sqlite://path/to/db — the file is created on connect, the
    // directory is not.
    if let Some(path) = config.database.url.strip_prefix("sqlite://")
        && let Some(parent) = std::path::Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            AppError::internal(format!(
                "Failed to create database directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    tokio::fs::create_dir_all(&config.storage.blob_root)
        .await
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create blob root {}: {e}",
                config.storage.blob_root
            ))
        })?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
