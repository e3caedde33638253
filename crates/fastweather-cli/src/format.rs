//! Text and JSON rendering of a weather result.

use std::fmt::Write;

use anyhow::Result;
use fastweather_query::WeatherResult;

pub fn render_json(result: &WeatherResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn render_text(result: &WeatherResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", result.location);
    let _ = writeln!(
        out,
        "  {}  {}",
        or_na(&result.temperature),
        or_na(&result.weather_description)
    );
    let _ = writeln!(out, "  Wind: {}", or_na(&result.wind_speed));

    match result.aqi_category() {
        Some(category) => {
            let _ = writeln!(out, "  Air Quality Index: {} ({})", result.aqi, category);
        }
        None => {
            let _ = writeln!(out, "  Air Quality Index: {}", or_na(&result.aqi));
        }
    }

    let _ = writeln!(
        out,
        "  High: {} / Low: {}",
        or_na(&result.high_temp),
        or_na(&result.low_temp)
    );
    let _ = writeln!(
        out,
        "  Sunrise: {}  Sunset: {}",
        or_na(&result.sunrise),
        or_na(&result.sunset)
    );

    if let Some(description) = result.condition_description() {
        let _ = writeln!(out, "  Conditions: {}", description);
    }
    let _ = write!(out, "  Theme: {}", result.theme());

    out
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherResult {
        WeatherResult::from_payload_text(
            r#"{
                "location": "Delhi, India",
                "temperature": "31°C",
                "weatherDescription": "Haze",
                "windSpeed": "9 km/h",
                "aqi": "155",
                "highTemp": "34°C",
                "lowTemp": "24°C",
                "sunrise": "6:10 AM",
                "sunset": "6:02 PM",
                "weatherCode": 45
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_text_includes_classifications() {
        let text = render_text(&sample());
        assert!(text.starts_with("Delhi, India\n"));
        assert!(text.contains("Air Quality Index: 155 (Extremely Poor)"));
        assert!(text.contains("Conditions: Fog"));
        assert!(text.contains("Theme: cloudy"));
    }

    #[test]
    fn test_text_fills_blanks() {
        let result = WeatherResult::from_payload_text(r#"{"location":"Nowhere","aqi":"N/A"}"#)
            .unwrap();
        let text = render_text(&result);
        assert!(text.contains("Wind: N/A"));
        assert!(text.contains("Air Quality Index: N/A\n"));
        assert!(text.contains("Theme: default"));
        assert!(!text.contains("Conditions"));
    }

    #[test]
    fn test_json_is_verbatim() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["weatherDescription"], "Haze");
        assert_eq!(value["weatherCode"], 45);
    }
}
