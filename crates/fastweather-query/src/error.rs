//! Query-specific error types.

use fastweather_core::{AppError, WeatherError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("City name is empty")]
    EmptyInput,

    #[error("API call failed with status: {status}")]
    HttpStatus { status: u16 },

    #[error("Rate limited on all {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Could not find weather data for this location")]
    NoData,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Query was replaced by a newer one")]
    Cancelled,
}

impl QueryError {
    /// Application-level view of this error
    pub fn to_weather_error(&self) -> WeatherError {
        match self {
            Self::EmptyInput => WeatherError::EmptyInput,
            Self::HttpStatus { status } => WeatherError::ServiceError { status: *status },
            Self::RateLimitExhausted { attempts } => WeatherError::RateLimited {
                attempts: *attempts,
            },
            Self::MalformedResponse(reason) => WeatherError::InvalidResponse(reason.clone()),
            Self::NoData => WeatherError::LocationNotFound,
            Self::Transport(e) => WeatherError::Network(e.to_string()),
            Self::Cancelled => WeatherError::Cancelled,
        }
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> &'static str {
        self.to_weather_error().user_message()
    }
}

impl From<QueryError> for WeatherError {
    fn from(e: QueryError) -> Self {
        e.to_weather_error()
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::Weather(e.to_weather_error())
    }
}
