//! Errors raised while talking to the todo API.

use hemmer_provider_sdk::ProviderError;
use todo_core::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured host is not an absolute http(s) URL.
    #[error("invalid todo API host {host:?}: {reason}")]
    InvalidHost { host: String, reason: &'static str },

    /// A todo ID in state is not a UUID.
    #[error("invalid todo ID {0:?}: {1}")]
    InvalidId(String, #[source] uuid::Error),

    /// The request never produced an HTTP response.
    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The API answered with an error status or an unreadable body.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api(ApiError::NotFound))
    }

    /// Wrap into the error reported to the host, prefixed with `context`.
    ///
    /// The variant carries the failure class: a missing todo is `NotFound`,
    /// an unreachable or failing server is `Unavailable`.
    pub fn into_provider_error(self, context: impl std::fmt::Display) -> ProviderError {
        let message = format!("{context}: {self}");
        match self {
            _ if self.is_not_found() => ProviderError::NotFound(message),
            ClientError::Transport(_) => ProviderError::Unavailable(message),
            ClientError::Api(ApiError::HttpError { status, .. }) if status >= 500 => {
                ProviderError::Unavailable(message)
            }
            ClientError::InvalidId(..) => ProviderError::InvalidRequest(message),
            ClientError::InvalidHost { .. } => ProviderError::Configuration(message),
            ClientError::Api(_) => ProviderError::FailedPrecondition(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_keeps_its_class() {
        let err = ClientError::Api(ApiError::NotFound).into_provider_error("Error reading todo");
        assert!(matches!(err, ProviderError::NotFound(_)));
        assert_eq!(err.message(), "Error reading todo: todo not found");
    }

    #[test]
    fn server_errors_are_unavailable() {
        let err = ClientError::Api(ApiError::HttpError {
            status: 503,
            body: "down".to_string(),
        })
        .into_provider_error("Unable to read todos");
        assert!(matches!(err, ProviderError::Unavailable(_)));
        assert_eq!(err.message(), "Unable to read todos: HTTP 503: down");
    }

    #[test]
    fn client_errors_are_failed_preconditions() {
        let err = ClientError::Api(ApiError::HttpError {
            status: 422,
            body: "bad".to_string(),
        })
        .into_provider_error("Error updating todo");
        assert!(matches!(err, ProviderError::FailedPrecondition(_)));
    }

    #[test]
    fn malformed_ids_are_invalid_requests() {
        let source = uuid::Uuid::parse_str("nope").unwrap_err();
        let err = ClientError::InvalidId("nope".to_string(), source).into_provider_error("Error reading todo");
        assert!(matches!(err, ProviderError::InvalidRequest(_)));
        assert!(err.message().starts_with("Error reading todo: invalid todo ID \"nope\""));
    }
}
