//! Analysis API endpoint - JSON API

use crate::error::{ApiError, ApiResult};
use crate::routes::range::RangeQuery;
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use findash_ai::AnalysisClient;
use findash_core::{analysis_prompt, parse_sections, AnalysisSection, MonthRange};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub range: MonthRange,
    pub text: String,
    pub sections: Vec<AnalysisSection>,
}

fn client(state: &AppState) -> ApiResult<AnalysisClient> {
    if !state.config.ai.enabled {
        return Err(ApiError::Unavailable { message: "AI analysis is disabled".to_string() });
    }
    match &state.ai {
        Some(client) => Ok(client.clone()),
        // the key may have been exported after start-up
        None => Ok(AnalysisClient::from_config(&state.config.ai)?),
    }
}

/// Build the prompt for a range and send it
pub(crate) async fn generate_analysis(
    state: &AppState,
    query: &RangeQuery,
) -> ApiResult<AnalysisResponse> {
    let client = client(state)?;

    let (range, prompt) = {
        let dashboard = state.dashboard.read().await;
        let dataset = dashboard.dataset()?;
        let range = query.resolve(dataset)?;
        let prompt = analysis_prompt(&range, dataset.filter(&range)?);
        (range, prompt)
    };

    let text = client.generate(&prompt).await?;
    Ok(AnalysisResponse {
        range,
        sections: parse_sections(&text),
        text,
    })
}

pub async fn api_analysis(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<AnalysisResponse>> {
    Ok(Json(generate_analysis(&state, &query).await?))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{post, sample_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_analysis_disabled() {
        let (status, body) = post(sample_state().await, "/api/analysis").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("AI analysis is disabled"));
    }

    #[tokio::test]
    async fn test_analysis_against_mock_service() {
        use axum::routing::post as post_route;
        use axum::{Json, Router};
        use findash_ai::AnalysisClient;

        async fn reply(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
            let prompt = body.pointer("/contents/0/parts/0/text").and_then(|t| t.as_str()).unwrap_or_default();
            let first_line = prompt.lines().nth(1).unwrap_or_default().to_string();
            Json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": format!("### Summary\n{}\n### Risks\nNone", first_line)}]}}]
            }))
        }

        let app = Router::new().route("/v1/models/:call", post_route(reply));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mut state = sample_state().await;
        state.config.ai.enabled = true;
        state.config.ai.endpoint = format!("http://{}/v1", addr);
        let client = AnalysisClient::with_api_key(&state.config.ai, "test-key").unwrap();
        let state = state.with_ai(client);

        let (status, body) = post(state, "/api/analysis?start=2025-01&end=2025-03").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["sections"][0]["title"], "Summary");
        assert!(json["sections"][0]["body"].as_str().unwrap().contains("Jan 2025"));
        assert_eq!(json["sections"][1]["title"], "Risks");
    }

    #[tokio::test]
    async fn test_analysis_missing_key() {
        let mut state = sample_state().await;
        state.config.ai.enabled = true;
        state.config.ai.api_key_env = "FINDASH_API_TEST_UNSET_KEY".to_string();
        let (status, body) = post(state, "/api/analysis?start=2025-01&end=2025-03").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("Configuration error"));
        assert!(body.contains("FINDASH_API_TEST_UNSET_KEY"));
    }
}
