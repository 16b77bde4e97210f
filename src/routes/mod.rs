use axum::{Json, Router, extract::rejection::JsonRejection};
use validator::Validate;

use crate::{error::AppResult, state::AppState};

pub mod auth;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(products::router())
        .merge(orders::router())
}

/// Unwraps a JSON body and runs its validators. Handlers call this only after
/// the access policy has passed, so anonymous or forbidden callers never see
/// payload errors.
pub(crate) fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(payload)
}
