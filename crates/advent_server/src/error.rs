use advent_core::db::DbError;
use advent_core::{EditorError, PreferenceError, RetrievalError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde_json::json;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Memory not found")]
    MemoryNotFound,

    #[error("Memory not yet unlocked")]
    Locked,

    #[error("Unknown color category")]
    UnknownCategory,

    #[error("{0}")]
    BadRequest(String),

    /// The cause is logged, never returned to the client.
    #[error("An unexpected error occurred")]
    Unexpected(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MemoryNotFound | ApiError::UnknownCategory => StatusCode::NOT_FOUND,
            ApiError::Locked => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn log_cause(&self) {
        if let ApiError::Unexpected(cause) = self {
            error!("event=request_failed module=server status=error cause={cause}");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_cause();
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<RetrievalError> for ApiError {
    fn from(value: RetrievalError) -> Self {
        match value {
            RetrievalError::NotFound(_) => ApiError::MemoryNotFound,
            RetrievalError::Locked(_) => ApiError::Locked,
            RetrievalError::Unexpected(err) => ApiError::Unexpected(err.to_string()),
        }
    }
}

impl From<EditorError> for ApiError {
    fn from(value: EditorError) -> Self {
        match value {
            EditorError::NotFound(_) => ApiError::MemoryNotFound,
            err if err.is_validation() => ApiError::BadRequest(err.to_string()),
            err => ApiError::Unexpected(err.to_string()),
        }
    }
}

impl From<PreferenceError> for ApiError {
    fn from(value: PreferenceError) -> Self {
        match value {
            PreferenceError::UnknownCategory(_) => ApiError::UnknownCategory,
            err @ PreferenceError::EmptyColor => ApiError::BadRequest(err.to_string()),
            PreferenceError::Repo(err) => ApiError::Unexpected(err.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(value: DbError) -> Self {
        ApiError::Unexpected(value.to_string())
    }
}

impl From<JoinError> for ApiError {
    fn from(value: JoinError) -> Self {
        ApiError::Unexpected(format!("blocking task failed: {value}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use advent_core::{PreferenceError, RetrievalError};
    use axum::http::StatusCode;

    #[test]
    fn retrieval_errors_map_to_status_codes() {
        assert_eq!(
            ApiError::from(RetrievalError::NotFound(3)).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RetrievalError::Locked(3)).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn unexpected_message_hides_cause() {
        let err = ApiError::Unexpected("disk I/O error at /var/lib/advent.db".to_string());
        assert_eq!(err.to_string(), "An unexpected error occurred");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn empty_color_is_bad_request() {
        let err = ApiError::from(PreferenceError::EmptyColor);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "color cannot be empty");
    }
}
