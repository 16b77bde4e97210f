use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::auth::{RegisterRequest, TokenRequest, TokenResponse},
    error::AppResult,
    models::User,
    response::ApiResponse,
    routes::validated,
    services::auth_service::{obtain_token as issue_token, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/", post(register))
        .route("/api-token-auth/", post(obtain_token))
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let payload = validated(payload)?;
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn obtain_token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<TokenResponse>>> {
    let payload = validated(payload)?;
    let resp = issue_token(&state, payload).await?;
    Ok(Json(resp))
}
