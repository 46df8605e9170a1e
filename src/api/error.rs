use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

use crate::management::DirectoryError;

/// Error envelope returned by every route:
/// `{"code": ..., "message": ..., "data": {"status": ..., ...}}`.
#[derive(Debug, Clone)]
pub struct RestError {
    pub code: String,
    pub message: String,
    pub status: StatusCode,
    pub data: Map<String, Value>,
}

impl RestError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            status,
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "rest_forbidden",
            "Sorry, you are not allowed to do that.",
        )
    }

    pub fn missing_params(params: &[&str]) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "rest_missing_callback_param",
            format!("Missing parameter(s): {}", params.join(", ")),
        )
        .with_data("params", json!(params))
    }

    pub fn invalid_param(param: &str, reason: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "rest_invalid_param",
            format!("Invalid parameter(s): {}", param),
        )
        .with_data("params", json!({ param: reason }))
    }

    pub fn invalid_json(reason: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "rest_invalid_json",
            format!("Invalid JSON body passed: {}", reason),
        )
    }

    pub fn no_route() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "rest_no_route",
            "No route was found matching the URL and request method.",
        )
    }

    pub fn post_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "rest_post_invalid_id", "Invalid post ID.")
    }

    pub fn guest_not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "rest_guest_not_found",
            "Guest author not found.",
        )
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let mut data = self.data;
        data.insert("status".to_string(), json!(self.status.as_u16()));
        let body = json!({
            "code": self.code,
            "message": self.message,
            "data": data,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<DirectoryError> for RestError {
    fn from(err: DirectoryError) -> Self {
        let message = err.to_string();
        match err {
            DirectoryError::GuestNotFound(_) => Self::guest_not_found(),
            DirectoryError::PostNotFound(_) => Self::post_not_found(),
            DirectoryError::FieldRequired(field) => {
                Self::new(StatusCode::BAD_REQUEST, "field-required", message)
                    .with_data("field", json!(field))
            }
            DirectoryError::LoginTaken(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "rest_guest_invalid_username",
                message,
            ),
            DirectoryError::InvalidEmail(_) | DirectoryError::EmailTaken(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "rest_guest_invalid_email",
                message,
            ),
            DirectoryError::InvalidLinkedAccount(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "rest_guest_invalid_linked_account",
                message,
            ),
            DirectoryError::ReassignTargetNotFound(_) => Self::new(
                StatusCode::BAD_REQUEST,
                "rest_reassigned_user_not_found",
                message,
            ),
            DirectoryError::AuthorNotAttached { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                "rest_author_not_attached",
                message,
            ),
            DirectoryError::LastAuthor(_) => {
                Self::new(StatusCode::BAD_REQUEST, "rest_author_last", message)
            }
            DirectoryError::IdsExhausted | DirectoryError::Io(_) | DirectoryError::Serde(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "rest_internal_error",
                message,
            ),
        }
    }
}
