use std::process::ExitCode;

use tracing::{error, info};

use filegate::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use filegate::web::handlers::AppState;
use filegate::{Config, FileStore, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match Config::load_with_env(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {config_path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = filegate::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        filegate::logging::init_console_only(&config.logging.level);
    }

    // The storage root is resolved exactly once and shared from here on.
    let store = match config
        .files
        .resolve_storage_root()
        .and_then(FileStore::new)
    {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to prepare storage directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("using storage location: {}", store.root().display());

    let app_state = AppState::new(store).with_max_upload_size(config.files.max_upload_bytes());

    let server = match WebServer::new(&config.server, app_state) {
        Ok(server) => server,
        Err(e) => {
            error!("Invalid server configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
