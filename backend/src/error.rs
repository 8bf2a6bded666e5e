//! Error types for the prediction transport and configuration loading.
//!
//! None of these reach the dashboard state: forecast failures are absorbed by
//! the orchestrator and turned into an empty forecast series.

/// Failure talking to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForecastError {
    /// Network, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Prediction service returned HTTP {status}")]
    Status { status: u16 },

    /// The body was not a valid forecast document.
    #[error("Malformed forecast response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::Transport(err.to_string())
    }
}

/// Result type for forecast transport calls
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Failure loading [`crate::config::DashboardConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ForecastError::Status { status: 502 }.to_string(),
            "Prediction service returned HTTP 502"
        );
        assert!(ForecastError::Decode("missing field `forecast`".into())
            .to_string()
            .contains("forecast"));
        assert!(ConfigError::Invalid("PORT must be a valid port number".into())
            .to_string()
            .starts_with("Invalid configuration"));
    }
}
