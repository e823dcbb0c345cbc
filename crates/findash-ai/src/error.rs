//! Error types for findash-ai

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key not found, set the {var} environment variable")]
    MissingApiKey { var: String },

    #[error("Generative API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response format from the generative API: {message}")]
    MalformedResponse { message: String },

    #[error("Request failed: {message}")]
    Transport { message: String, timeout: bool },
}

impl AiError {
    /// Message shown to dashboard users
    pub fn user_message(&self) -> String {
        match self {
            AiError::MissingApiKey { .. } => format!("Configuration error: {}", self),
            AiError::Api { .. } => format!("Failed to generate the analysis: {}", self),
            AiError::MalformedResponse { .. } => "Failed to process the API response".to_string(),
            AiError::Transport { timeout: true, .. } => "The request timed out".to_string(),
            AiError::Transport { .. } => {
                "Could not reach the analysis service. Check your connection and try again.".to_string()
            }
        }
    }

    /// Whether the dashboard configuration, not the remote service, is at fault
    pub fn is_configuration(&self) -> bool {
        matches!(self, AiError::MissingApiKey { .. })
    }
}

impl From<reqwest::Error> for AiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            AiError::MalformedResponse { message: error.to_string() }
        } else {
            AiError::Transport {
                timeout: error.is_timeout(),
                message: error.without_url().to_string(),
            }
        }
    }
}

pub type AiResult<T> = Result<T, AiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let missing = AiError::MissingApiKey { var: "GEMINI_API_KEY".to_string() };
        assert!(missing.user_message().starts_with("Configuration error"));
        assert!(missing.user_message().contains("GEMINI_API_KEY"));
        assert!(missing.is_configuration());

        let api = AiError::Api { status: 403, message: "API key not valid".to_string() };
        assert!(api.user_message().contains("(403)"));
        assert!(api.user_message().contains("API key not valid"));

        let malformed = AiError::MalformedResponse { message: "no candidates".to_string() };
        assert_eq!(malformed.user_message(), "Failed to process the API response");

        let timeout = AiError::Transport { message: "timed out".to_string(), timeout: true };
        assert_eq!(timeout.user_message(), "The request timed out");
        assert!(!timeout.is_configuration());
    }
}
