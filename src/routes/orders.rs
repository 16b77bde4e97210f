use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    policy::{self, Action, Resource},
    response::ApiResponse,
    routes::{params::OrderListQuery, validated},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/orders/", get(list_orders).post(create_order))
}

pub async fn list_orders(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let user = policy::authorize(user.as_ref(), Resource::Order, Action::List)?;
    let Query(query) = query?;
    let resp = order_service::list_orders(&state, user, query).await?;
    Ok(Json(resp))
}

pub async fn create_order(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let user = policy::authorize(user.as_ref(), Resource::Order, Action::Create)?;
    let payload = validated(payload)?;
    let resp = order_service::create_order(&state, user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
