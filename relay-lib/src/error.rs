use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Every way a relay invocation can fail. The `Display` text is the `error`
/// string handed back to the caller.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid or missing API key")]
    Unauthorized,

    #[error("Invalid webhook path")]
    InvalidDestination,

    #[error("Embed must contain at least one of the fields: title, description or fields")]
    MissingContent,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Discord returned an error: {}", .status.as_u16())]
    Upstream { status: StatusCode, details: Value },

    #[error("Error sending webhook: {0}")]
    Transport(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
            RelayError::InvalidDestination
            | RelayError::MissingContent
            | RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { status, .. } => *status,
            RelayError::Transport(_) | RelayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client mistakes are logged as warnings, everything else as errors.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::Unauthorized
                | RelayError::InvalidDestination
                | RelayError::MissingContent
                | RelayError::Validation(_)
        )
    }
}

impl From<validator::ValidationErrors> for RelayError {
    fn from(err: validator::ValidationErrors) -> RelayError {
        RelayError::Validation(err.to_string())
    }
}
