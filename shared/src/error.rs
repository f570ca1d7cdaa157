use lambda_http::http::StatusCode;
use thiserror::Error;

/// Failure of one of the managed services, or of the caller's input.
///
/// A document-store miss is not an error: repositories return `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(String),

    #[error("{service} request failed: {message}")]
    Downstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl ServiceError {
    pub fn downstream(service: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Downstream {
            service,
            status: None,
            message: message.into(),
        }
    }

    pub fn downstream_with_status(
        service: &'static str,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        ServiceError::Downstream {
            service,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingParameter(_) | ServiceError::InvalidRecord(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Downstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Status code returned by the failing service, when it answered at all.
    pub fn downstream_status(&self) -> Option<u16> {
        match self {
            ServiceError::Downstream { status, .. } => *status,
            _ => None,
        }
    }
}
