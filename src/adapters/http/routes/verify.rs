//! Verification: consume a single-use token, exactly once.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, ErrorCode},
    application::use_cases::verification::VerifyOutcome,
};

#[derive(Deserialize)]
struct VerifyPayload {
    token: Option<String>,
}

#[derive(Deserialize)]
struct VerifyQuery {
    token: Option<String>,
}

#[derive(Serialize)]
struct VerifyResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl VerifyResponse {
    fn from_outcome(outcome: &VerifyOutcome) -> Self {
        let identity = outcome.identity();
        let message = match outcome {
            VerifyOutcome::Verified(_) => "Email verified successfully",
            VerifyOutcome::AlreadyVerified(_) => "already verified",
        };
        Self {
            success: true,
            user_id: Some(identity.user_id.to_string()),
            user_type: Some(identity.user_type.as_str().to_string()),
            name: Some(identity.name.clone()),
            email: Some(identity.email.clone()),
            message: Some(message.to_string()),
            error: None,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/verify-email", get(verify_email_get).post(verify_email_post))
}

/// JSON variant used by the SPA.
async fn verify_email_post(
    State(app_state): State<AppState>,
    Json(payload): Json<VerifyPayload>,
) -> Response {
    let token = payload.token.unwrap_or_default();
    match app_state.verification.verify(&token).await {
        Ok(outcome) => {
            (StatusCode::OK, Json(VerifyResponse::from_outcome(&outcome))).into_response()
        }
        Err(AppError::InvalidToken) => failure_response(
            StatusCode::BAD_REQUEST,
            "Verification token is missing or malformed",
        ),
        Err(AppError::NotFoundOrExpired) => failure_response(
            StatusCode::NOT_FOUND,
            "Invalid or expired verification link",
        ),
        Err(other) => other.into_response(),
    }
}

/// Legacy link-click variant: always answers with a redirect to the site's
/// result page, success or not.
async fn verify_email_get(
    State(app_state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let token = query.token.unwrap_or_default();
    let result = app_state.verification.verify(&token).await;

    let base = format!(
        "{}/verify-result",
        app_state.config.site_url.as_str().trim_end_matches('/')
    );
    let mut url = match Url::parse(&base) {
        Ok(url) => url,
        Err(err) => {
            return AppError::Internal(format!("bad redirect base {base:?}: {err}"))
                .into_response();
        }
    };

    match result {
        Ok(outcome) => {
            let identity = outcome.identity();
            url.query_pairs_mut()
                .append_pair("success", "true")
                .append_pair("user_id", &identity.user_id.to_string())
                .append_pair("user_type", identity.user_type.as_str())
                .append_pair("name", &identity.name)
                .append_pair("email", &identity.email);
            if matches!(outcome, VerifyOutcome::AlreadyVerified(_)) {
                url.query_pairs_mut().append_pair("message", "already verified");
            }
        }
        Err(err) => {
            tracing::error!(error = ?err, "verification via link failed");
            let code = match err {
                AppError::InvalidToken => ErrorCode::InvalidToken,
                AppError::NotFoundOrExpired => ErrorCode::InvalidOrExpiredToken,
                AppError::DependencyUnavailable(_) => ErrorCode::ServiceUnavailable,
                _ => ErrorCode::InternalError,
            };
            url.query_pairs_mut()
                .append_pair("success", "false")
                .append_pair("error", code.as_str());
        }
    }

    (
        StatusCode::FOUND,
        [(header::LOCATION, url.to_string())],
    )
        .into_response()
}

fn failure_response(status: StatusCode, error: &str) -> Response {
    (
        status,
        Json(VerifyResponse {
            success: false,
            user_id: None,
            user_type: None,
            name: None,
            email: None,
            message: None,
            error: Some(error.to_string()),
        }),
    )
        .into_response()
}
