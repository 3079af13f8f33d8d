//! Error types for provider operations.

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Error type for provider operations.
///
/// Carries the failing operation name for log context. Transport-level
/// failures are marked retryable; decode and configuration failures are not.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport-level request failure. Typically transient.
    #[error("Request error [operation={operation}]: {message}")]
    RequestError { operation: String, message: String },

    /// The upstream payload could not be decoded into the expected shape.
    #[error("Decode error [operation={operation}]: {message}")]
    DecodeError { operation: String, message: String },

    /// Requested entity was not found upstream.
    #[error("Not found [operation={operation}]: {message}")]
    NotFound { operation: String, message: String },

    /// Configuration or initialization error.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl ProviderError {
    pub fn request(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn decode(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DecodeError {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn not_found(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RequestError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_operation() {
        let err = ProviderError::request("fetch_positions", "connection refused");
        let rendered = err.to_string();
        assert!(rendered.contains("fetch_positions"));
        assert!(rendered.contains("connection refused"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::request("op", "timeout").is_retryable());
        assert!(!ProviderError::decode("op", "bad json").is_retryable());
        assert!(!ProviderError::configuration("missing base url").is_retryable());
    }
}
