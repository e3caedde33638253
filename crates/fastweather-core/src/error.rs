//! Centralized error types for FastWeather.
//!
//! Library crates keep their own precise error enums and convert into
//! [`AppError`] at the boundary. Use `user_message()` for anything shown to
//! the user; the `Display` impls keep full context for logging.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap an `anyhow` error, keeping a typed config or IO error found in its
    /// chain.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ConfigError>() {
            Ok(e) => return AppError::Config(e),
            Err(err) => err,
        };
        match err.downcast::<std::io::Error>() {
            Ok(e) => AppError::Io(e),
            Err(err) => AppError::Other(err),
        }
    }

    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather lookup errors, as seen by the application layer.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No city given")]
    EmptyInput,

    #[error("Weather API returned status {status}")]
    ServiceError { status: u16 },

    #[error("Rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No weather data for this location")]
    LocationNotFound,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::EmptyInput => "Please enter a city name.",
            WeatherError::ServiceError { status } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            WeatherError::ServiceError { .. } => "The weather request failed. Please try again.",
            WeatherError::RateLimited { .. } => {
                "The weather service is busy. Please wait and try again."
            }
            WeatherError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
            WeatherError::LocationNotFound => "Could not find weather data for this location.",
            WeatherError::Network(_) => "Unable to connect. Check your internet connection.",
            WeatherError::Cancelled => "The request was replaced by a newer one.",
        }
    }
}
