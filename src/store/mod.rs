//! Data-access seam between the services and storage.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Order, OrderStatus, Product, Sex, User, UserRole},
    visibility::{OrderScope, ProductScope},
};

pub mod memory;
pub mod sea;

pub use memory::MemoryStore;
pub use sea::SeaOrmStore;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub sex: Sex,
    pub role: UserRole,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub seller_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub product_id: i64,
    pub units: i32,
    pub status: OrderStatus,
    pub buyer_id: i64,
}

/// Window into a listing, already normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub fn all() -> Self {
        Self {
            limit: i64::MAX as u64,
            offset: 0,
        }
    }
}

/// Listings are ordered by insertion and return the page plus the total size
/// of the scoped collection.
///
/// Deletes are restricted: removing a user or product that is still
/// referenced fails with `AppError::Conflict`. A second order for the same
/// product also fails with `AppError::Conflict`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_user(&self, new: NewUser) -> AppResult<User>;
    async fn find_user_by_uuid(&self, uuid: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn delete_user(&self, uuid: Uuid) -> AppResult<()>;

    async fn insert_product(&self, new: NewProduct) -> AppResult<Product>;
    async fn find_product(&self, uuid: Uuid) -> AppResult<Option<Product>>;
    async fn list_products(&self, scope: ProductScope, page: Page)
    -> AppResult<(Vec<Product>, u64)>;
    async fn delete_product(&self, uuid: Uuid) -> AppResult<()>;

    async fn insert_order(&self, new: NewOrder) -> AppResult<Order>;
    async fn list_orders(
        &self,
        scope: OrderScope,
        status: Option<OrderStatus>,
        page: Page,
    ) -> AppResult<(Vec<Order>, u64)>;
}
