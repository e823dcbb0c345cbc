//! Client for the `generateContent` text-generation API
//!
//! One request per call: no retries, no streaming.

pub mod error;

use findash_config::AiConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{AiError, AiResult};

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: Option<String>,
}

/// Text generation client built from the `ai` config section
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl AnalysisClient {
    /// Build a client, reading the API key from the configured environment variable
    pub fn from_config(config: &AiConfig) -> AiResult<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey { var: config.api_key_env.clone() })?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: &AiConfig, api_key: impl Into<String>) -> AiResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey { var: config.api_key_env.clone() });
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Send a prompt and return the first candidate's text
    pub async fn generate(&self, prompt: &str) -> AiResult<String> {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt }] }],
        };

        log::info!("Requesting analysis from model {}", self.model);
        let response = self
            .http
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            log::warn!("Analysis request failed with status {}: {}", status.as_u16(), message);
            return Err(AiError::Api { status: status.as_u16(), message });
        }

        extract_text(&body)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body
fn extract_text(body: &str) -> AiResult<String> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AiError::MalformedResponse { message: e.to_string() })?;

    value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|text| text.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AiError::MalformedResponse {
            message: "missing candidates[0].content.parts[0].text".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::collections::HashMap;

    async fn generate_handler(
        Path(call): Path<String>,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, String) {
        assert_eq!(call, "test-model:generateContent");
        let prompt = body
            .pointer("/contents/0/parts/0/text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string();

        match query.get("key").map(String::as_str) {
            Some("good") => (
                StatusCode::OK,
                serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": format!("### Summary\n{}", prompt)}]}}]
                })
                .to_string(),
            ),
            Some("bad") => (
                StatusCode::FORBIDDEN,
                r#"{"error": {"code": 403, "message": "API key not valid"}}"#.to_string(),
            ),
            Some("plain") => (StatusCode::SERVICE_UNAVAILABLE, "overloaded".to_string()),
            _ => (StatusCode::OK, r#"{"candidates": []}"#.to_string()),
        }
    }

    async fn mock_server() -> String {
        let app = Router::new().route("/v1beta/models/:call", post(generate_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1beta", addr)
    }

    fn config(endpoint: &str) -> AiConfig {
        AiConfig {
            enabled: true,
            endpoint: endpoint.to_string(),
            model: "test-model".to_string(),
            api_key_env: "FINDASH_TEST_UNSET_KEY".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_generate_success() {
        let endpoint = mock_server().await;
        let client = AnalysisClient::with_api_key(&config(&endpoint), "good").unwrap();
        let text = client.generate("How did we do?").await.unwrap();
        assert_eq!(text, "### Summary\nHow did we do?");
    }

    #[tokio::test]
    async fn test_generate_api_error_message() {
        let endpoint = mock_server().await;
        let client = AnalysisClient::with_api_key(&config(&endpoint), "bad").unwrap();
        match client.generate("x").await {
            Err(AiError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_api_error_falls_back_to_reason() {
        let endpoint = mock_server().await;
        let client = AnalysisClient::with_api_key(&config(&endpoint), "plain").unwrap();
        match client.generate("x").await {
            Err(AiError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_malformed_response() {
        let endpoint = mock_server().await;
        let client = AnalysisClient::with_api_key(&config(&endpoint), "empty").unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, AiError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_transport_error() {
        // nothing listens on port 9 locally
        let client = AnalysisClient::with_api_key(&config("http://127.0.0.1:9/v1beta"), "good").unwrap();
        let err = client.generate("x").await.unwrap_err();
        assert!(matches!(err, AiError::Transport { .. }));
    }

    #[test]
    fn test_missing_api_key() {
        let err = AnalysisClient::from_config(&config("http://localhost")).unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey { ref var } if var == "FINDASH_TEST_UNSET_KEY"));
        assert!(AnalysisClient::with_api_key(&config("http://localhost"), "  ").is_err());
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "hello");
        assert!(extract_text("not json").is_err());
        assert!(extract_text(r#"{"candidates":[{"content":{"parts":[]}}]}"#).is_err());
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = AnalysisClient::with_api_key(&config("https://example.test/v1beta/"), "k").unwrap();
        assert_eq!(client.url(), "https://example.test/v1beta/models/test-model:generateContent");
        assert_eq!(client.model(), "test-model");
    }
}
