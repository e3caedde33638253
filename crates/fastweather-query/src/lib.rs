//! Weather lookup through a generative API.
//!
//! Sends a city to a `generateContent` endpoint with retry/backoff on rate
//! limiting, validates the JSON the model returns, and classifies the result
//! for display (background theme, AQI category).

pub mod api;
pub mod classify;
pub mod client;
pub mod error;
pub mod retry;
pub mod session;
pub mod types;

pub use classify::{aqi_category, theme_for_weather_code, wmo_description, AqiCategory, Theme};
pub use client::{ClientSettings, WeatherQueryClient};
pub use error::QueryError;
pub use retry::RetryConfig;
pub use session::{SessionState, WeatherSession};
pub use types::{WeatherQuery, WeatherResult};
