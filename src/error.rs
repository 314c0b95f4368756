use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Client error: {0}")]
    ClientError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("No image data returned")]
    NoImageReturned,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for StudioError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StudioError::RequestError(format!("HTTP request timed out: {}", e))
        } else {
            StudioError::RequestError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(e: serde_json::Error) -> Self {
        StudioError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StudioError::ApiError {
            status: 429,
            message: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "API error (429): quota exceeded");

        let err = StudioError::Timeout(Duration::from_secs(15));
        assert_eq!(err.to_string(), "Request timed out after 15000ms");
    }
}
