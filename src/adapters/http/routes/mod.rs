pub mod health;
pub mod register;
pub mod verify;
pub mod welcome;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new()
        .merge(register::router(app_state))
        .merge(verify::router())
        .merge(welcome::router())
        .merge(health::router())
}
