//! Welcome email: queue-position email after quiz completion.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState,
    app_error::AppResult,
    application::validators::validate_welcome,
};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SendWelcomePayload {
    email: Option<String>,
    name: Option<String>,
    user_type: Option<String>,
    waitlist_position: Option<i64>,
}

impl SendWelcomePayload {
    fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.name.is_none()
            && self.user_type.is_none()
            && self.waitlist_position.is_none()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendWelcomeResponse {
    success: bool,
    message_id: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/send-welcome-email", post(send_welcome_email))
}

async fn send_welcome_email(
    State(app_state): State<AppState>,
    Json(payload): Json<SendWelcomePayload>,
) -> AppResult<impl IntoResponse> {
    // An empty body is the batch/cron variant: the store picks the user.
    let input = if payload.is_empty() {
        None
    } else {
        Some(validate_welcome(
            payload.email.as_deref().unwrap_or_default(),
            payload.name.as_deref().unwrap_or_default(),
            payload.user_type.as_deref().unwrap_or_default(),
            payload.waitlist_position,
        )?)
    };

    let receipt = app_state.welcome.send_welcome(input).await?;

    Ok((
        StatusCode::OK,
        Json(SendWelcomeResponse {
            success: true,
            message_id: receipt.message_id,
        }),
    ))
}
