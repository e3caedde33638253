//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::types::WeatherQuery;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides concise and accurate \
weather information for a given city. Search for the current temperature, a brief weather \
description (e.g., 'Sunny', 'Partly Cloudy'), wind speed, air quality index (AQI), today's high \
and low temperatures, sunrise and sunset times, and the weather code. Provide the data in a \
clear, formatted JSON object. If you cannot find a specific piece of information, use 'N/A'.";

const RESPONSE_MIME_TYPE: &str = "application/json";

/// Fields requested from the model, with their schema types
pub const RESPONSE_FIELDS: &[(&str, &str)] = &[
    ("location", "STRING"),
    ("temperature", "STRING"),
    ("weatherDescription", "STRING"),
    ("windSpeed", "STRING"),
    ("aqi", "STRING"),
    ("highTemp", "STRING"),
    ("lowTemp", "STRING"),
    ("sunrise", "STRING"),
    ("sunset", "STRING"),
    ("weatherCode", "INTEGER"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoogleSearch {}

#[derive(Debug, Clone, Serialize)]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn for_query(query: &WeatherQuery) -> Self {
        Self {
            contents: vec![Content::text(query.prompt())],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            system_instruction: Content::text(SYSTEM_PROMPT),
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE,
                response_schema: response_schema(),
            },
        }
    }
}

fn response_schema() -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = RESPONSE_FIELDS
        .iter()
        .map(|(name, kind)| (name.to_string(), serde_json::json!({ "type": kind })))
        .collect();

    serde_json::json!({
        "type": "OBJECT",
        "properties": properties,
    })
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
    }
}

/// Pull the model's text out of a raw response body.
pub fn extract_text(body: &str) -> Result<String, QueryError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| QueryError::MalformedResponse(format!("response body is not JSON: {}", e)))?;

    envelope
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| QueryError::MalformedResponse("no candidate text in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let query = WeatherQuery::new("Tokyo").unwrap();
        let body = serde_json::to_value(GenerateContentRequest::for_query(&query)).unwrap();

        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Current weather and AQI for Tokyo"
        );
        assert_eq!(body["tools"][0]["google_search"], serde_json::json!({}));
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("'N/A'"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );

        let schema = &body["generationConfig"]["responseSchema"];
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["properties"].as_object().unwrap().len(), 10);
        assert_eq!(schema["properties"]["weatherCode"]["type"], "INTEGER");
        assert_eq!(schema["properties"]["location"]["type"], "STRING");
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"{\"location\":\"X\"}"}],"role":"model"}}]}"#;
        assert_eq!(extract_text(body).unwrap(), r#"{"location":"X"}"#);
    }

    #[test]
    fn test_extract_text_missing_steps() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"inlineData":{}}]}}]}"#,
        ] {
            let err = extract_text(body).unwrap_err();
            assert!(matches!(err, QueryError::MalformedResponse(_)), "body {}", body);
        }
    }

    #[test]
    fn test_extract_text_not_json() {
        let err = extract_text("<html>oops</html>").unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }
}
