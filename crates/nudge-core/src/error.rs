//! Error types for the core crate.

use thiserror::Error;

/// Errors raised by core services.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Reading or writing a shared document failed.
    #[error("storage error: {0}")]
    Storage(#[from] nudge_persistence::PersistenceError),

    /// HTTP request to the code-hosting API failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The code-hosting API answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Missing or malformed configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Not an IANA timezone name.
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        CoreError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Api {
            status: 403,
            body: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "API error 403: rate limited");

        let err = CoreError::InvalidTimezone("Mars/Olympus".into());
        assert_eq!(err.to_string(), "invalid timezone: Mars/Olympus");
    }
}
