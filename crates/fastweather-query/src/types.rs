use serde::{Deserialize, Deserializer, Serialize};

use crate::classify::{aqi_category, theme_for_weather_code, wmo_description, AqiCategory, Theme};
use crate::error::QueryError;

/// A single user request for weather at a city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    city: String,
}

impl WeatherQuery {
    /// Build a query, trimming the city. Blank input is rejected.
    pub fn new(city: &str) -> Result<Self, QueryError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(QueryError::EmptyInput);
        }
        Ok(Self {
            city: city.to_string(),
        })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// The user turn sent to the model
    pub fn prompt(&self) -> String {
        format!("Current weather and AQI for {}", self.city)
    }
}

/// Weather as reported by the generative API.
///
/// String fields are passed through verbatim; the remote service uses `"N/A"`
/// for anything it could not find. A `weatherCode` that is not an integer
/// (`"N/A"`, `null`) is read as no code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub temperature: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weather_description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub wind_speed: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub aqi: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub high_temp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub low_temp: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sunrise: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sunset: String,
    #[serde(default, deserialize_with = "lenient_code")]
    pub weather_code: Option<i32>,
}

impl WeatherResult {
    /// Parse the JSON text embedded in a model response.
    ///
    /// Text that is not JSON, or a string field holding an array or object,
    /// is a malformed response. Well-formed JSON without a usable `location`
    /// is `NoData`.
    pub fn from_payload_text(text: &str) -> Result<Self, QueryError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| QueryError::MalformedResponse(format!("payload is not JSON: {}", e)))?;

        let has_location = value
            .get("location")
            .and_then(scalar_text)
            .is_some_and(|s| !s.trim().is_empty());
        if !has_location {
            return Err(QueryError::NoData);
        }

        serde_json::from_value(value)
            .map_err(|e| QueryError::MalformedResponse(format!("unexpected payload shape: {}", e)))
    }

    /// Background theme for this result's weather code
    pub fn theme(&self) -> Theme {
        theme_for_weather_code(self.weather_code)
    }

    /// Numeric AQI, read like `parseInt`: leading digits only, so `"42 (Fair)"`
    /// is 42 and `"N/A"` has no value.
    pub fn aqi_value(&self) -> Option<i64> {
        leading_integer(&self.aqi)
    }

    pub fn aqi_category(&self) -> Option<AqiCategory> {
        self.aqi_value().map(aqi_category)
    }

    /// WMO description of the weather code, if the code is a known one
    pub fn condition_description(&self) -> Option<&'static str> {
        self.weather_code.and_then(wmo_description)
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate instead of failing on absurdly long digit runs
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Text of a JSON scalar; `null` is empty, arrays and objects have none
fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Null => Some(String::new()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept strings, numbers and booleans for string fields; `null` becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    scalar_text(&value)
        .ok_or_else(|| D::Error::custom(format!("expected a string, got {}", value)))
}

/// Integers (or integer strings) are a code; anything else is no code.
fn lenient_code<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let code = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(code)
}
