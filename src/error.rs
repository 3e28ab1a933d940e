use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

/// Failures surfaced by the feature services to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl From<ServiceError> for (StatusCode, String) {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ServiceError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ServiceError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ServiceError::Internal(e) => {
                error!(error = ?e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Maps plumbing errors straight to a 500 in handlers.
pub(crate) fn internal(e: anyhow::Error) -> (StatusCode, String) {
    ServiceError::Internal(e).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let (s, m): (StatusCode, String) = ServiceError::BadRequest("bad".into()).into();
        assert_eq!((s, m.as_str()), (StatusCode::BAD_REQUEST, "bad"));

        let (s, m): (StatusCode, String) = ServiceError::NotFound("Goal").into();
        assert_eq!((s, m.as_str()), (StatusCode::NOT_FOUND, "Goal not found"));

        let (s, _): (StatusCode, String) = ServiceError::Conflict("dup".into()).into();
        assert_eq!(s, StatusCode::CONFLICT);
    }

    #[test]
    fn internal_errors_hide_details() {
        let (s, m) = internal(anyhow::anyhow!("connection refused to 10.0.0.1"));
        assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!m.contains("10.0.0.1"));
    }
}
