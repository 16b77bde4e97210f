use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Order, OrderStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub product: Uuid,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub units: i32,
    /// Must match the caller when present.
    pub buyer: Option<Uuid>,
    /// Accepted for compatibility and ignored; new orders always start in the cart.
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct OrderList {
    pub items: Vec<Order>,
}
