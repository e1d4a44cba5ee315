use thiserror::Error;

/// Validation and contract errors exposed by `tasi-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("result limit {value} is outside {min}..={max}")]
    LimitOutOfRange { value: usize, min: usize, max: usize },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failure of a single upstream API call.
///
/// Every variant is recoverable: callers report it and render the dependent
/// section as unavailable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        endpoint: String,
        message: String,
        timeout: bool,
    },
    #[error("{endpoint} returned HTTP status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => endpoint,
        }
    }

    /// Stable machine-readable code used in output envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transport { timeout: true, .. } => "api.timeout",
            Self::Transport { .. } => "api.transport",
            Self::Status { .. } => "api.status",
            Self::Decode { .. } => "api.decode",
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Errors raised while loading the static fundamentals dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset row {row}: {source}")]
    Validation {
        row: u64,
        #[source]
        source: ValidationError,
    },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_codes_distinguish_timeouts() {
        let timeout = ApiError::Transport {
            endpoint: String::from("/market/summary/"),
            message: String::from("deadline elapsed"),
            timeout: true,
        };
        let refused = ApiError::Transport {
            endpoint: String::from("/market/summary/"),
            message: String::from("connection refused"),
            timeout: false,
        };

        assert_eq!(timeout.code(), "api.timeout");
        assert_eq!(refused.code(), "api.transport");
        assert_eq!(timeout.endpoint(), "/market/summary/");
    }

    #[test]
    fn only_404_counts_as_not_found() {
        let missing = ApiError::Status {
            endpoint: String::from("/quote/9999/"),
            status: 404,
        };
        let server = ApiError::Status {
            endpoint: String::from("/quote/2222/"),
            status: 503,
        };

        assert!(missing.is_not_found());
        assert!(!server.is_not_found());
    }
}
