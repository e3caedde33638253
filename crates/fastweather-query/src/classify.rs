//! Display classifiers: background theme from WMO weather codes and AQI
//! severity buckets.

use serde::{Deserialize, Serialize};

/// Background theme derived from a WMO weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// No weather loaded
    #[default]
    Default,
    Clear,
    Cloudy,
    Rainy,
    Stormy,
}

impl Theme {
    /// Map a WMO code to a theme. Unmapped codes fall back to cloudy.
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: Option<i32>) -> Self {
        match code {
            None => Self::Default,
            Some(0..=1) => Self::Clear,
            Some(2..=3) => Self::Cloudy,
            Some(51..=67) | Some(80..=82) => Self::Rainy,
            Some(c) if c >= 95 => Self::Stormy,
            Some(_) => Self::Cloudy,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Stormy => "stormy",
        }
    }

    /// Style class applied by the presentation layer, `None` for the plain background
    pub fn style_class(&self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Clear => Some("sunny"),
            Self::Cloudy => Some("cloudy"),
            Self::Rainy => Some("rainy"),
            Self::Stormy => Some("stormy"),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn theme_for_weather_code(code: Option<i32>) -> Theme {
    Theme::from_wmo_code(code)
}

/// Air quality bucket, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiCategory {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    ExtremelyPoor,
}

impl AqiCategory {
    /// Upper bounds are inclusive: 20 is still `Good`.
    pub fn from_value(value: i64) -> Self {
        match value {
            v if v <= 20 => Self::Good,
            v if v <= 40 => Self::Fair,
            v if v <= 60 => Self::Moderate,
            v if v <= 80 => Self::Poor,
            v if v <= 100 => Self::VeryPoor,
            _ => Self::ExtremelyPoor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::ExtremelyPoor => "Extremely Poor",
        }
    }

    /// Colour tag for the category badge
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Fair => "yellow",
            Self::Moderate => "orange",
            Self::Poor => "red",
            Self::VeryPoor => "purple",
            Self::ExtremelyPoor => "maroon",
        }
    }

    /// 0 for `Good` through 5 for `ExtremelyPoor`
    pub fn severity_rank(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn aqi_category(value: i64) -> AqiCategory {
    AqiCategory::from_value(value)
}

/// Human-readable description for known WMO weather interpretation codes
pub fn wmo_description(code: i32) -> Option<&'static str> {
    let description = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Drizzle: Light",
        53 => "Drizzle: Moderate",
        55 => "Drizzle: Dense",
        56 => "Freezing Drizzle: Light",
        57 => "Freezing Drizzle: Dense",
        61 => "Rain: Slight",
        63 => "Rain: Moderate",
        65 => "Rain: Heavy",
        66 => "Freezing Rain: Light",
        67 => "Freezing Rain: Heavy",
        71 => "Snow fall: Slight",
        73 => "Snow fall: Moderate",
        75 => "Snow fall: Heavy",
        77 => "Snow grains",
        80 => "Rain showers: Slight",
        81 => "Rain showers: Moderate",
        82 => "Rain showers: Violent",
        85 => "Snow showers: Slight",
        86 => "Snow showers: Heavy",
        95 => "Thunderstorm: Slight or moderate",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return None,
    };
    Some(description)
}
