use std::process::ExitCode;
use std::sync::Arc;

use teloxide::Bot;

use slova_bot::config::Config;
use slova_bot::db::Database;
use slova_bot::logging::init_tracing;
use slova_bot::session::SessionStore;
use slova_bot::workers::WorkerManager;
use slova_bot::{create_controller, telegram};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_tracing(&config.logging);

    let db = match Database::from_env().await {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, "database connection failed");
            return ExitCode::FAILURE;
        }
    };

    let sessions = Arc::new(SessionStore::new());
    let controller = match create_controller(db.clone(), Arc::clone(&sessions)).await {
        Ok(controller) => Arc::new(controller),
        Err(err) => {
            tracing::error!(error = %err, "database initialization failed");
            return ExitCode::FAILURE;
        }
    };

    let workers = match WorkerManager::new(Arc::clone(&sessions), config.session.clone()).await {
        Ok(manager) => {
            if let Err(e) = manager.start().await {
                tracing::error!(error = %e, "failed to start workers");
            }
            Some(manager)
        }
        Err(e) => {
            tracing::warn!(error = %e, "worker manager not initialized");
            None
        }
    };

    telegram::run(Bot::new(config.bot_token), controller).await;

    tracing::info!("initiating graceful shutdown sequence");

    if let Some(ref manager) = workers {
        manager.stop().await;
    }
    db.close().await;

    tracing::info!("Graceful shutdown complete");
    ExitCode::SUCCESS
}
