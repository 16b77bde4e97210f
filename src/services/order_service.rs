use crate::{
    dto::orders::{CreateOrderRequest, OrderList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
    store::NewOrder,
    visibility::{OrderScope, ProductScope},
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, per_page, window) = query.pagination().normalize();
    let scope = OrderScope::for_caller(user);
    let (items, total) = state
        .store
        .list_orders(scope, query.status, window)
        .await?;

    tracing::debug!(user = %user.uuid, ?scope, total, "orders listed");
    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

/// Places an order for the caller. Whatever status the client sent, the
/// order is stored in `cart`.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    if payload.buyer.is_some_and(|buyer| buyer != user.uuid) {
        return Err(AppError::field("buyer", "must be the authenticated user"));
    }

    // Products hidden from the caller are reported exactly like unknown ones.
    let scope = ProductScope::for_caller(user);
    let product = state
        .store
        .find_product(payload.product)
        .await?
        .filter(|p| scope.matches(p))
        .ok_or_else(|| AppError::field("product", "does not exist"))?;

    if let Some(status) = payload.status.filter(|s| *s != OrderStatus::Cart) {
        tracing::debug!(requested = ?status, "ignoring client-supplied order status");
    }

    let order = state
        .store
        .insert_order(NewOrder {
            product_id: product.id,
            units: payload.units,
            status: OrderStatus::Cart,
            buyer_id: user.user_id,
        })
        .await?;

    tracing::info!(
        user = %user.uuid,
        order = %order.uuid,
        product = %order.product,
        units = order.units,
        "order placed"
    );
    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}
