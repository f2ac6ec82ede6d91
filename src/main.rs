use std::path::Path;
use std::sync::Arc;

use tracing::info;

use filedrop::{Config, LocalFileStore, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config = if Path::new(CONFIG_PATH).exists() {
        match Config::load_with_env(CONFIG_PATH) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {CONFIG_PATH}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    if let Err(e) = filedrop::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        filedrop::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let store = match LocalFileStore::from_config(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to initialize file storage: {}", e);
            std::process::exit(1);
        }
    };
    info!("File storage initialized at: {}", config.storage.upload_dir);

    let server = match WebServer::new(&config, Arc::new(store)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Server running on {}, URL: {}",
        server.addr(),
        config.server.public_url
    );

    if let Err(e) = server.run().await {
        tracing::error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
