use chrono::Utc;
use marketplace_api::{
    middleware::auth::AuthUser,
    models::{Order, OrderStatus, Product, UserRole},
    visibility::{OrderScope, ProductScope},
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn caller(id: i64, role: UserRole) -> AuthUser {
    AuthUser {
        user_id: id,
        uuid: Uuid::new_v4(),
        role,
    }
}

fn product(id: i64, seller_id: i64, is_active: bool) -> Product {
    Product {
        id,
        uuid: Uuid::new_v4(),
        name: format!("Product {id}"),
        description: String::new(),
        price: Decimal::new(10, 0),
        stock: 10,
        is_active,
        seller_id,
        seller: Uuid::new_v4(),
        created: Utc::now(),
    }
}

fn order(id: i64, buyer_id: i64, seller_id: i64) -> Order {
    Order {
        id,
        uuid: Uuid::new_v4(),
        product_id: id,
        product: Uuid::new_v4(),
        seller_id,
        units: 1,
        buyer_id,
        buyer: Uuid::new_v4(),
        status: OrderStatus::Cart,
        created: Utc::now(),
        modified: None,
    }
}

#[test]
fn seller_sees_own_inventory_including_inactive() {
    let seller = caller(1, UserRole::Seller);
    let scope = ProductScope::for_caller(&seller);
    assert_eq!(scope, ProductScope::OwnedBy(1));

    assert!(scope.matches(&product(10, 1, true)));
    assert!(scope.matches(&product(11, 1, false)));
    assert!(!scope.matches(&product(12, 2, true)));
}

#[test]
fn buyer_sees_active_products_from_every_seller() {
    let buyer = caller(3, UserRole::Buyer);
    let scope = ProductScope::for_caller(&buyer);
    assert_eq!(scope, ProductScope::Active);

    assert!(scope.matches(&product(10, 1, true)));
    assert!(scope.matches(&product(11, 2, true)));
    assert!(!scope.matches(&product(12, 1, false)));
}

#[test]
fn buyer_sees_only_own_orders() {
    let buyer = caller(3, UserRole::Buyer);
    let scope = OrderScope::for_caller(&buyer);
    assert_eq!(scope, OrderScope::PlacedBy(3));

    assert!(scope.matches(&order(20, 3, 1)));
    assert!(!scope.matches(&order(21, 4, 1)));
}

#[test]
fn seller_sees_orders_against_own_products() {
    let seller = caller(1, UserRole::Seller);
    let scope = OrderScope::for_caller(&seller);
    assert_eq!(scope, OrderScope::ForSeller(1));

    assert!(scope.matches(&order(20, 3, 1)));
    assert!(scope.matches(&order(21, 4, 1)));
    assert!(!scope.matches(&order(22, 3, 2)));
}
