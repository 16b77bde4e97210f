//! Read-side scoping: which records of a collection a caller may see.
//!
//! A scope is plain data. The in-memory store evaluates it with `matches`;
//! the PostgreSQL store compiles it into a query condition.

use crate::{
    middleware::auth::AuthUser,
    models::{Order, Product, UserRole},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    /// The seller's whole inventory, active or not.
    OwnedBy(i64),
    /// Active listings from every seller.
    Active,
}

impl ProductScope {
    pub fn for_caller(caller: &AuthUser) -> Self {
        match caller.role {
            UserRole::Seller => ProductScope::OwnedBy(caller.user_id),
            UserRole::Buyer => ProductScope::Active,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductScope::OwnedBy(seller_id) => product.seller_id == *seller_id,
            ProductScope::Active => product.is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    PlacedBy(i64),
    /// Orders against products the seller owns.
    ForSeller(i64),
}

impl OrderScope {
    pub fn for_caller(caller: &AuthUser) -> Self {
        match caller.role {
            UserRole::Buyer => OrderScope::PlacedBy(caller.user_id),
            UserRole::Seller => OrderScope::ForSeller(caller.user_id),
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderScope::PlacedBy(buyer_id) => order.buyer_id == *buyer_id,
            OrderScope::ForSeller(seller_id) => order.seller_id == *seller_id,
        }
    }
}
