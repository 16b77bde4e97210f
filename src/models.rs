use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

pub use crate::entity::sea_orm_active_enums::{OrderStatus, Sex, UserRole};

// Surrogate ids stay server-side; every reference leaving the API is a UUID.

#[derive(Debug, Clone, Serialize)]
pub struct User {
    #[serde(skip)]
    pub id: i64,
    pub uuid: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip)]
    pub password_hash: String,
    pub sex: Sex,
    #[serde(rename = "type")]
    pub role: UserRole,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    #[serde(skip)]
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    #[serde(skip)]
    pub seller_id: i64,
    pub seller: Uuid,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    #[serde(skip)]
    pub id: i64,
    pub uuid: Uuid,
    #[serde(skip)]
    pub product_id: i64,
    pub product: Uuid,
    /// Owner of the ordered product, used to scope seller listings.
    #[serde(skip)]
    pub seller_id: i64,
    pub units: i32,
    #[serde(skip)]
    pub buyer_id: i64,
    pub buyer: Uuid,
    pub status: OrderStatus,
    pub created: DateTime<Utc>,
    pub modified: Option<DateTime<Utc>>,
}
