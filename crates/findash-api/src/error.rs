//! Error types for findash-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use findash_ai::AiError;
use findash_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("{message}")]
    Unavailable { message: String },

    #[error("{message}")]
    Upstream { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(error) => match error {
                CoreError::MonthNotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
                _ if error.is_client_error() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<AiError> for ApiError {
    fn from(error: AiError) -> Self {
        if error.is_configuration() {
            ApiError::Unavailable { message: error.user_message() }
        } else {
            ApiError::Upstream { message: error.user_message() }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        let body = match &self {
            ApiError::Core(error) => {
                let details = error.to_details();
                serde_json::json!({
                    "error": details.message,
                    "code": details.code,
                    "suggestions": details.suggestions,
                })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let not_found: ApiError = CoreError::MonthNotFound { month: "2030-01".to_string() }.into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid: ApiError = CoreError::InvalidMonth { value: "jan".to_string() }.into();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let not_loaded: ApiError = CoreError::NotLoaded.into();
        assert_eq!(not_loaded.status(), StatusCode::SERVICE_UNAVAILABLE);

        let unordered: ApiError = CoreError::UnorderedMonths {
            previous: "2025-02".to_string(),
            month: "2025-01".to_string(),
        }
        .into();
        assert_eq!(unordered.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let io: ApiError = CoreError::IoError { message: "denied".to_string() }.into();
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_core_error_body_carries_code_and_suggestions() {
        let error: ApiError = CoreError::MonthNotFound { month: "2030-01".to_string() }.into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "MONTH_NOT_FOUND");
        assert!(json["error"].as_str().unwrap().contains("2030-01"));
        assert!(json["suggestions"][0].as_str().unwrap().contains("/api/months"));
    }

    #[test]
    fn test_ai_error_mapping() {
        let missing: ApiError = AiError::MissingApiKey { var: "KEY".to_string() }.into();
        assert_eq!(missing.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(missing.to_string().starts_with("Configuration error"));

        let upstream: ApiError = AiError::Api { status: 500, message: "boom".to_string() }.into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }
}
