//! Registration: create a waitlist user and send the verification email.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, middleware::require_service_key},
    app_error::AppResult,
    application::use_cases::registration::EmailDispatchOutcome,
    application::validators::validate_registration,
    domain::entities::waitlist_user::WaitlistUser,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendVerificationPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    user_type: String,
    verification_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendVerificationResponse {
    success: bool,
    user: WaitlistUser,
    // Handed out once here; the serialized user itself never carries it.
    verification_token: String,
    email_dispatch: EmailDispatchBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailDispatchBody {
    delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<EmailDispatchOutcome> for EmailDispatchBody {
    fn from(outcome: EmailDispatchOutcome) -> Self {
        match outcome {
            EmailDispatchOutcome::Delivered { message_id } => Self {
                delivered: true,
                message_id: Some(message_id),
                error: None,
            },
            EmailDispatchOutcome::Failed { reason } => Self {
                delivered: false,
                message_id: None,
                error: Some(reason),
            },
        }
    }
}

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/send-verification-email", post(send_verification_email))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            require_service_key,
        ))
}

async fn send_verification_email(
    State(app_state): State<AppState>,
    Json(payload): Json<SendVerificationPayload>,
) -> AppResult<impl IntoResponse> {
    let input = validate_registration(
        &payload.email,
        &payload.name,
        &payload.user_type,
        payload.verification_token.as_deref(),
    )?;

    let outcome = app_state.registration.register(input).await?;

    let verification_token = outcome
        .user
        .verification_token
        .clone()
        .unwrap_or_default();

    Ok((
        StatusCode::OK,
        Json(SendVerificationResponse {
            success: true,
            user: outcome.user,
            verification_token,
            email_dispatch: outcome.email_dispatch.into(),
        }),
    ))
}
