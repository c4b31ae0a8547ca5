use std::process::ExitCode;

use tracing::{error, info};

use nodekb::{Config, Database, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = nodekb::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        nodekb::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let db = match Database::open(&config.database.url, config.database.max_connections).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to open database");
            return ExitCode::FAILURE;
        }
    };
    info!("Connected to database");

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Failed to create web server");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = server.run().await {
        error!(error = %e, "Web server stopped");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
