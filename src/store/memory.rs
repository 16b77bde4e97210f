use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{NewOrder, NewProduct, NewUser, Page, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderStatus, Product, User},
    visibility::{OrderScope, ProductScope},
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store holding everything behind one mutex.
///
/// Enforces the same uniqueness and restrict rules as the SQL schema, so
/// services behave identically against it.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("memory store lock poisoned")))
    }
}

fn paginate<T: Clone>(items: Vec<&T>, page: Page) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();
    (items, total)
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> AppResult<User> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.username == new.username) {
            return Err(AppError::Conflict("username already exists".into()));
        }

        let user = User {
            id: tables.next_id(),
            uuid: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            password_hash: new.password_hash,
            sex: new.sex,
            role: new.role,
            date_joined: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_uuid(&self, uuid: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|u| u.uuid == uuid).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn delete_user(&self, uuid: Uuid) -> AppResult<()> {
        let mut tables = self.tables()?;
        let idx = tables
            .users
            .iter()
            .position(|u| u.uuid == uuid)
            .ok_or(AppError::NotFound)?;
        let id = tables.users[idx].id;

        if tables.products.iter().any(|p| p.seller_id == id) {
            return Err(AppError::Conflict("user still owns products".into()));
        }
        if tables.orders.iter().any(|o| o.buyer_id == id) {
            return Err(AppError::Conflict("user still has orders".into()));
        }

        tables.users.remove(idx);
        Ok(())
    }

    async fn insert_product(&self, new: NewProduct) -> AppResult<Product> {
        let mut tables = self.tables()?;
        let seller = tables
            .users
            .iter()
            .find(|u| u.id == new.seller_id)
            .map(|u| u.uuid)
            .ok_or_else(|| AppError::Conflict("seller does not exist".into()))?;

        let product = Product {
            id: tables.next_id(),
            uuid: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            stock: new.stock,
            is_active: new.is_active,
            seller_id: new.seller_id,
            seller,
            created: Utc::now(),
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn find_product(&self, uuid: Uuid) -> AppResult<Option<Product>> {
        let tables = self.tables()?;
        Ok(tables.products.iter().find(|p| p.uuid == uuid).cloned())
    }

    async fn list_products(
        &self,
        scope: ProductScope,
        page: Page,
    ) -> AppResult<(Vec<Product>, u64)> {
        let tables = self.tables()?;
        let visible = tables.products.iter().filter(|p| scope.matches(p)).collect();
        Ok(paginate(visible, page))
    }

    async fn delete_product(&self, uuid: Uuid) -> AppResult<()> {
        let mut tables = self.tables()?;
        let idx = tables
            .products
            .iter()
            .position(|p| p.uuid == uuid)
            .ok_or(AppError::NotFound)?;
        let id = tables.products[idx].id;

        if tables.orders.iter().any(|o| o.product_id == id) {
            return Err(AppError::Conflict("product still has an order".into()));
        }

        tables.products.remove(idx);
        Ok(())
    }

    async fn insert_order(&self, new: NewOrder) -> AppResult<Order> {
        let mut tables = self.tables()?;
        if tables.orders.iter().any(|o| o.product_id == new.product_id) {
            return Err(AppError::Conflict("product already has an order".into()));
        }

        let (product, seller_id) = tables
            .products
            .iter()
            .find(|p| p.id == new.product_id)
            .map(|p| (p.uuid, p.seller_id))
            .ok_or_else(|| AppError::Conflict("product does not exist".into()))?;
        let buyer = tables
            .users
            .iter()
            .find(|u| u.id == new.buyer_id)
            .map(|u| u.uuid)
            .ok_or_else(|| AppError::Conflict("buyer does not exist".into()))?;

        let order = Order {
            id: tables.next_id(),
            uuid: Uuid::new_v4(),
            product_id: new.product_id,
            product,
            seller_id,
            units: new.units,
            buyer_id: new.buyer_id,
            buyer,
            status: new.status,
            created: Utc::now(),
            modified: None,
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn list_orders(
        &self,
        scope: OrderScope,
        status: Option<OrderStatus>,
        page: Page,
    ) -> AppResult<(Vec<Order>, u64)> {
        let tables = self.tables()?;
        let visible = tables
            .orders
            .iter()
            .filter(|o| scope.matches(o))
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect();
        Ok(paginate(visible, page))
    }
}
