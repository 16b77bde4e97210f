use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    policy::{self, Action, Resource},
    response::ApiResponse,
    routes::{params::Pagination, validated},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products/", get(list_products).post(create_product))
        .route(
            "/products/{id}/",
            get(get_product)
                .put(update_product)
                .patch(partial_update_product)
                .delete(delete_product),
        )
}

pub async fn list_products(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let user = policy::authorize(user.as_ref(), Resource::Product, Action::List)?;
    let Query(pagination) = query?;
    let resp = product_service::list_products(&state, user, pagination).await?;
    Ok(Json(resp))
}

pub async fn get_product(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let user = policy::authorize(user.as_ref(), Resource::Product, Action::Retrieve)?;
    let Path(id) = id.map_err(|_| AppError::NotFound)?;
    let resp = product_service::get_product(&state, user, id).await?;
    Ok(Json(resp))
}

pub async fn create_product(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let user = policy::authorize(user.as_ref(), Resource::Product, Action::Create)?;
    let payload = validated(payload)?;
    let resp = product_service::create_product(&state, user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

// Products have no update or delete path. These routes exist so the policy
// answers them (401/403) instead of the router.

pub async fn update_product(user: Option<AuthUser>) -> AppResult<StatusCode> {
    unsupported(user, Action::Update)
}

pub async fn partial_update_product(user: Option<AuthUser>) -> AppResult<StatusCode> {
    unsupported(user, Action::PartialUpdate)
}

pub async fn delete_product(user: Option<AuthUser>) -> AppResult<StatusCode> {
    unsupported(user, Action::Destroy)
}

fn unsupported(user: Option<AuthUser>, action: Action) -> AppResult<StatusCode> {
    policy::authorize(user.as_ref(), Resource::Product, action)?;
    Err(AppError::MethodNotAllowed)
}
