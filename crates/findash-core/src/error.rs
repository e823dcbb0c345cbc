//! Error types for findash-core
//!
//! Error codes, messages and resolution hints for dataset loading
//! and range selection.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Dataset not loaded
    NotLoaded,
    /// Dataset has no records
    EmptyDataset,
    /// Month key is not `YYYY-MM`
    InvalidMonth,
    /// Records are not in strictly ascending month order
    UnorderedMonths,
    /// Month not present in the dataset
    MonthNotFound,
    /// Parse error
    ParseError,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::EmptyDataset => write!(f, "EMPTY_DATASET"),
            ErrorCode::InvalidMonth => write!(f, "INVALID_MONTH"),
            ErrorCode::UnorderedMonths => write!(f, "UNORDERED_MONTHS"),
            ErrorCode::MonthNotFound => write!(f, "MONTH_NOT_FOUND"),
            ErrorCode::ParseError => write!(f, "PARSE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            suggestions: vec![],
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for findash-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Dataset not loaded")]
    NotLoaded,

    #[error("Dataset contains no records")]
    EmptyDataset,

    #[error("Invalid month '{value}', expected YYYY-MM")]
    InvalidMonth { value: String },

    #[error("Month {month} is out of order (previous record is {previous})")]
    UnorderedMonths { previous: String, month: String },

    #[error("Month not found: {month}")]
    MonthNotFound { month: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::EmptyDataset => ErrorCode::EmptyDataset,
            CoreError::InvalidMonth { .. } => ErrorCode::InvalidMonth,
            CoreError::UnorderedMonths { .. } => ErrorCode::UnorderedMonths,
            CoreError::MonthNotFound { .. } => ErrorCode::MonthNotFound,
            CoreError::ParseError { .. } => ErrorCode::ParseError,
            CoreError::IoError { .. } => ErrorCode::IoError,
        }
    }

    /// Whether the error was caused by request input rather than the dataset
    pub fn is_client_error(&self) -> bool {
        matches!(self, CoreError::InvalidMonth { .. } | CoreError::MonthNotFound { .. })
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::MonthNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/months endpoint to list available months.".to_string()
                );
            }
            CoreError::UnorderedMonths { .. } => {
                details = details.with_suggestion(
                    "Sort the records by month and remove duplicates.".to_string()
                );
            }
            CoreError::ParseError { .. } => {
                details = details.with_suggestion(
                    "The dataset must be a JSON array of monthly records.".to_string()
                );
            }
            CoreError::IoError { .. } => {
                details = details.with_suggestion(
                    "Ensure the dataset file exists and is readable.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::IoError { message: error.to_string() }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::ParseError { message: error.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotLoaded.to_string(), "NOT_LOADED");
        assert_eq!(ErrorCode::MonthNotFound.to_string(), "MONTH_NOT_FOUND");
        assert_eq!(ErrorCode::UnorderedMonths.to_string(), "UNORDERED_MONTHS");
    }

    #[test]
    fn test_client_errors() {
        assert!(CoreError::MonthNotFound { month: "2030-01".to_string() }.is_client_error());
        assert!(CoreError::InvalidMonth { value: "x".to_string() }.is_client_error());
        assert!(!CoreError::NotLoaded.is_client_error());
        assert!(!CoreError::EmptyDataset.is_client_error());
    }

    #[test]
    fn test_error_details_month_not_found() {
        let error = CoreError::MonthNotFound { month: "2030-01".to_string() };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::MonthNotFound);
        assert!(details.message.contains("2030-01"));
        assert!(!details.suggestions.is_empty());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let error: CoreError = io_err.into();
        assert_eq!(error.code(), ErrorCode::IoError);
        assert!(error.to_string().contains("missing"));
    }
}
