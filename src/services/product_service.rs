use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    store::NewProduct,
    visibility::ProductScope,
};

// Callers reaching these functions have already passed the access policy.

pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, per_page, window) = pagination.normalize();
    let scope = ProductScope::for_caller(user);
    let (items, total) = state.store.list_products(scope, window).await?;

    tracing::debug!(user = %user.uuid, ?scope, total, "products listed");
    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

/// Records outside the caller's scope read as missing.
pub async fn get_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    let scope = ProductScope::for_caller(user);
    let product = state
        .store
        .find_product(id)
        .await?
        .filter(|p| scope.matches(p))
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let product = state
        .store
        .insert_product(NewProduct {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock: payload.stock,
            is_active: payload.is_active,
            seller_id: user.user_id,
        })
        .await?;

    tracing::info!(user = %user.uuid, product = %product.uuid, "product created");
    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}
