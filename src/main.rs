use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;

use sessionizer::app::{App, PickerState};
use sessionizer::catalog::Catalog;
use sessionizer::config::{self, Config};
use sessionizer::logging;
use sessionizer::process::SystemRunner;
use sessionizer::session::SessionOrchestrator;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logging is best effort; the picker works without it
    let _guard = match init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {:#}", e);
            None
        }
    };

    let config = Config::from_env();
    let runner = Arc::new(SystemRunner);
    let catalog = Catalog::new(&config, Arc::clone(&runner));

    let Some(state) = PickerState::initial(&catalog) else {
        eprintln!("No directories found in {}", config.roots_display());
        return Ok(ExitCode::FAILURE);
    };

    let orchestrator = SessionOrchestrator::new(&config, Arc::clone(&runner));
    let intent = {
        let mut app = App::new(config, runner, catalog, state)?;
        app.run().await?
    };

    let Some(intent) = intent else {
        return Ok(ExitCode::SUCCESS);
    };

    tracing::info!("Executing: {}", intent);
    if let Err(e) = intent.execute(&orchestrator) {
        tracing::error!("Failed to {}: {}", intent, e);
        eprintln!("Error: {}", e);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging() -> Result<logging::LoggingGuard> {
    config::ensure_directories(&config::app_dir())?;

    // Initialize file logging BEFORE any tracing calls
    let (log_file_info, guard) = logging::init_file_logging(config::logs_dir())?;

    // Clean up old logs (7-day retention)
    if let Ok(count) = logging::cleanup_old_logs(&config::logs_dir()) {
        if count > 0 {
            tracing::info!("Cleaned up {} old log files", count);
        }
    }

    tracing::info!("Logging to: {}", log_file_info.path.display());
    Ok(guard)
}
