use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

/// Guards function invocation with the service bearer credential. Only the
/// registration endpoint sits behind this; the verification link must work
/// from a plain email click.
pub async fn require_service_key(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token)
            if !token.is_empty()
                && token == app_state.config.service_api_key.expose_secret() =>
        {
            Ok(next.run(request).await)
        }
        _ => Err(AppError::Unauthorized),
    }
}
