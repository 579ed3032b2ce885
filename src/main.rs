use dotenv::dotenv;
use edusoft_backend::app::App;
use edusoft_backend::config::AppConfig;
use edusoft_backend::util::logger::Logger;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Before the logger, so LOG_DIR and RUST_LOG from .env apply
    let dotenv_result = dotenv();

    let _logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Starting EduSoft backend");
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => warn!("No .env file loaded: {} (using system env vars)", e),
    }

    let result = match AppConfig::from_env() {
        Ok(config) => match App::new(config).await {
            Ok(app) => app.start().await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
