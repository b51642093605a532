use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core::time::{format_primitive, primitive_now_utc};
use crate::services::analytics::AnalyticsError;
use crate::services::roster::RosterError;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) code: u16,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) path: Option<String>,
    pub(crate) timestamp: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) success: bool,
    pub(crate) error: ErrorBody,
}

impl ErrorEnvelope {
    pub(crate) fn new(status: StatusCode, message: String, path: Option<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: status.as_u16(),
                message,
                path,
                timestamp: format_primitive(primitive_now_utc()),
            },
        }
    }
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(&'static str),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::TooManyRequests(message) => message.to_string(),
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message)
            | ApiError::Internal(message) => message,
        };

        let mut response = (status, Json(ErrorEnvelope::new(status, message, None))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<RosterError> for ApiError {
    fn from(error: RosterError) -> Self {
        match error {
            RosterError::Invalid(message) => ApiError::BadRequest(message),
            RosterError::NotATeacher => ApiError::BadRequest(error.to_string()),
            RosterError::ClassNotFound
            | RosterError::NoValidStudents
            | RosterError::TeacherNotFound
            | RosterError::NotEnrolled
            | RosterError::NoTeacher => ApiError::NotFound(error.to_string()),
            RosterError::Database(err) => ApiError::internal(err, "Roster update failed"),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(error: AnalyticsError) -> Self {
        match error {
            AnalyticsError::Invalid(message) => ApiError::BadRequest(message),
            AnalyticsError::Database(err) => ApiError::internal(err, "Failed to compute analytics"),
            other => ApiError::NotFound(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn errors_use_the_envelope() {
        let response = ApiError::NotFound("Class not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], 404);
        assert_eq!(json["error"]["message"], "Class not found");
        assert!(json["error"].get("path").is_none());
        assert!(json["error"]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn roster_errors_map_to_taxonomy() {
        let status = |error: RosterError| ApiError::from(error).status();
        assert_eq!(status(RosterError::Invalid("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(RosterError::NotATeacher), StatusCode::BAD_REQUEST);
        assert_eq!(status(RosterError::NoValidStudents), StatusCode::NOT_FOUND);
        assert_eq!(status(RosterError::ClassNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(RosterError::Database(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unauthorized_sets_bearer_challenge() {
        let response = ApiError::Unauthorized("Invalid authentication credentials").into_response();
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }
}
