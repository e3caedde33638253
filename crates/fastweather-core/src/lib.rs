pub mod config;
pub mod error;

pub use config::{ApiConfig, Config, RetrySettings, ValidationResult};
pub use error::{AppError, ConfigError, WeatherError};

use anyhow::Result;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Initialize tracing/logging with the default `info` filter
pub fn init() -> Result<()> {
    init_with_level(DEFAULT_LOG_LEVEL)
}

/// Initialize tracing/logging, falling back to `level` when `RUST_LOG` is unset
pub fn init_with_level(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("FastWeather core initialized");
    Ok(())
}
