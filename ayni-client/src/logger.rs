//! Logging Infrastructure
//!
//! `tracing-subscriber` setup shared by the example binaries and any host
//! application embedding the board.

use tracing_subscriber::EnvFilter;

use crate::ClientConfig;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "ayni_client=info";

/// Initialize the logger with human-readable output
pub fn init_logger() {
    init_logger_with(None, false);
}

/// Initialize the logger.
///
/// `RUST_LOG` wins over `default_filter`. Calling this twice is harmless;
/// the second subscriber is simply not installed.
pub fn init_logger_with(default_filter: Option<&str>, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Logger already initialized: {}", e);
    }
}

/// Initialize logging as described by `config`
pub fn init_from_config(config: &ClientConfig) {
    init_logger_with(None, config.log_json);
}

/// Load `.env` (if present), read the client configuration and initialize
/// logging from it
pub fn setup_environment() -> ClientConfig {
    let dotenv = dotenvy::dotenv();
    let config = ClientConfig::from_env();
    init_from_config(&config);

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    config
}
