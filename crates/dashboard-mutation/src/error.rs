use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str = "Update failed";

const NETWORK_FAILURE_MESSAGE: &str = "Update failed: could not reach the server";
const MALFORMED_RESPONSE_MESSAGE: &str = "Update failed: unexpected response from server";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("status update request could not complete: {0}")]
    NetworkFailure(String),
    #[error(
        "status update rejected by server (http {status}): {}",
        .message.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE)
    )]
    ServerRejected {
        status: u16,
        message: Option<String>,
    },
    #[error("status update response was malformed: {0}")]
    MalformedResponse(String),
    #[error("complaint {0} has no status form on the page")]
    RowUnavailable(String),
    #[error("status update transport misconfigured: {0}")]
    Configuration(String),
}

pub type MutationResult<T> = Result<T, MutationError>;

impl MutationError {
    /// Text shown to the operator. Server-supplied error text wins.
    pub fn user_message(&self) -> String {
        match self {
            Self::ServerRejected {
                message: Some(message),
                ..
            } => message.clone(),
            Self::NetworkFailure(_) => NETWORK_FAILURE_MESSAGE.to_owned(),
            Self::MalformedResponse(_) => MALFORMED_RESPONSE_MESSAGE.to_owned(),
            Self::ServerRejected { message: None, .. }
            | Self::RowUnavailable(_)
            | Self::Configuration(_) => GENERIC_FAILURE_MESSAGE.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MutationError, GENERIC_FAILURE_MESSAGE};

    #[test]
    fn server_text_is_preferred_over_fallback() {
        let rejected = MutationError::ServerRejected {
            status: 200,
            message: Some("Complaint already closed".to_owned()),
        };
        assert_eq!(rejected.user_message(), "Complaint already closed");

        let bare = MutationError::ServerRejected {
            status: 500,
            message: None,
        };
        assert_eq!(bare.user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            bare.to_string(),
            "status update rejected by server (http 500): Update failed"
        );
    }

    #[test]
    fn failure_kinds_differ_only_in_text() {
        let network = MutationError::NetworkFailure("connection refused".to_owned());
        let malformed = MutationError::MalformedResponse("expected value".to_owned());

        assert_ne!(network.user_message(), malformed.user_message());
        assert!(network.user_message().starts_with(GENERIC_FAILURE_MESSAGE));
        assert!(malformed.user_message().starts_with(GENERIC_FAILURE_MESSAGE));
    }
}
