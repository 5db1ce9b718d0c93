use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        // Internal detail stays here; the body carries a stable code only.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::Validation(details) => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationFailed,
                Some("Validation failed".to_string()),
                Some(details),
            ),
            AppError::InvalidToken => error_resp(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidToken,
                Some("Verification token is missing or malformed".to_string()),
                None,
            ),
            AppError::NotFoundOrExpired => error_resp(
                StatusCode::NOT_FOUND,
                ErrorCode::InvalidOrExpiredToken,
                Some("Invalid or expired verification link".to_string()),
                None,
            ),
            AppError::AlreadyRegistered => error_resp(
                StatusCode::CONFLICT,
                ErrorCode::EmailAlreadyRegistered,
                Some("This email is already registered".to_string()),
                None,
            ),
            AppError::NotFound => error_resp(
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                None,
                None,
            ),
            AppError::Unauthorized => error_resp(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                None,
                None,
            ),
            AppError::RateLimited { retry_after_secs } => {
                let mut resp = error_resp(
                    StatusCode::TOO_MANY_REQUESTS,
                    ErrorCode::RateLimited,
                    Some(format!(
                        "Email provider rate limit hit; retry after {retry_after_secs} seconds"
                    )),
                    None,
                );
                if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                    resp.headers_mut().insert(header::RETRY_AFTER, value);
                }
                resp
            }
            AppError::DependencyUnavailable(_) => error_resp(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                Some(
                    "Service temporarily unavailable. Please contact support if the problem persists"
                        .to_string(),
                ),
                None,
            ),
            AppError::Database(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                None,
                None,
            ),
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                None,
                None,
            ),
        }
    }
}

fn error_resp(
    status: StatusCode,
    code: ErrorCode,
    message: Option<String>,
    details: Option<Vec<String>>,
) -> Response {
    let mut body = serde_json::json!({ "code": code.as_str() });
    if let Some(msg) = message {
        body["error"] = serde_json::Value::String(msg);
    }
    if let Some(details) = details {
        body["details"] = serde_json::json!(details);
    }
    (status, Json(body)).into_response()
}
