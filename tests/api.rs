mod common;

use axum::http::StatusCode;
use common::{TestApp, uuids};
use marketplace_api::models::UserRole;
use serde_json::json;

fn product_body() -> serde_json::Value {
    json!({
        "price": "120.50",
        "stock": 10,
        "name": "Computer",
        "description": "An awesome computer",
    })
}

#[tokio::test]
async fn registration_derives_username_and_hides_password() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/users/",
            None,
            Some(json!({
                "first_name": "Name",
                "last_name": "LastName",
                "email": "test@test.com",
                "sex": "male",
                "type": "buyer",
                "password": "Test1234",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let user = &body["data"];
    assert_eq!(user["username"], "NameLastName");
    assert_eq!(user["first_name"], "Name");
    assert_eq!(user["last_name"], "LastName");
    assert_eq!(user["email"], "test@test.com");
    assert_eq!(user["sex"], "male");
    assert_eq!(user["type"], "buyer");
    assert!(user["uuid"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
    assert!(user.get("id").is_none());
}

#[tokio::test]
async fn registration_defaults_to_buyer() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/users/",
            None,
            Some(json!({
                "username": "plain",
                "email": "plain@test.com",
                "password": "secret",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "buyer");
    assert_eq!(body["data"]["sex"], "male");
}

#[tokio::test]
async fn registration_rejects_taken_username_and_bad_email() {
    let app = TestApp::new();
    app.user("taken", UserRole::Buyer).await;

    let (status, _) = app
        .send(
            "POST",
            "/users/",
            None,
            Some(json!({ "username": "taken", "email": "x@test.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "POST",
            "/users/",
            None,
            Some(json!({ "username": "fresh", "email": "not-an-email", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["email"].is_array());
}

#[tokio::test]
async fn derived_username_longer_than_limit_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            "POST",
            "/users/",
            None,
            Some(json!({
                "first_name": "a".repeat(150),
                "last_name": "b".repeat(150),
                "email": "long@test.com",
                "password": "pw",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["username"].is_array());
    let stored = app
        .state
        .store
        .find_user_by_username(&format!("{}{}", "a".repeat(150), "b".repeat(150)))
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn token_is_issued_for_valid_credentials_only() {
    let app = TestApp::new();
    let (status, _) = app
        .send(
            "POST",
            "/users/",
            None,
            Some(json!({
                "username": "testuser",
                "email": "test@test.com",
                "type": "seller",
                "password": "test",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(
            "POST",
            "/api-token-auth/",
            None,
            Some(json!({ "username": "testuser", "password": "test" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().expect("token").to_string();

    let (status, _) = app.send("POST", "/products/", Some(&token), Some(product_body())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            "POST",
            "/api-token-auth/",
            None,
            Some(json!({ "username": "testuser", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            "POST",
            "/api-token-auth/",
            None,
            Some(json!({ "username": "nobody", "password": "test" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_writes_are_unauthorized_whatever_the_body() {
    let app = TestApp::new();
    for (uri, body) in [
        ("/products/", product_body()),
        ("/products/", json!({ "price": -1 })),
        ("/orders/", json!({ "units": 0 })),
        ("/orders/", json!({})),
    ] {
        let (status, _) = app.send("POST", uri, None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    let (status, _) = app.send("GET", "/products/", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_deleted_user_is_unauthorized() {
    let app = TestApp::new();
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let token = app.token(&buyer);
    app.state.store.delete_user(buyer.uuid).await.unwrap();

    let (status, _) = app.send("GET", "/orders/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buyer_cannot_create_products() {
    let app = TestApp::new();
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let token = app.token(&buyer);

    let (status, _) = app.send("POST", "/products/", Some(&token), Some(product_body())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("POST", "/products/", Some(&token), Some(json!({ "garbage": true })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn seller_cannot_create_orders() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let product = app.product(&seller, "Product Test", true).await;
    let token = app.token(&seller);

    let (status, _) = app
        .send(
            "POST",
            "/orders/",
            Some(&token),
            Some(json!({
                "product": product.uuid,
                "units": 10,
                "buyer": buyer.uuid,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn seller_creates_product_owned_by_themselves() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let token = app.token(&seller);

    let (status, body) = app.send("POST", "/products/", Some(&token), Some(product_body())).await;
    assert_eq!(status, StatusCode::CREATED);

    let product = &body["data"];
    assert_eq!(product["price"], "120.50");
    assert_eq!(product["stock"], 10);
    assert_eq!(product["name"], "Computer");
    assert_eq!(product["description"], "An awesome computer");
    assert_eq!(product["is_active"], true);
    assert_eq!(product["seller"], seller.uuid.to_string());
    assert!(product["uuid"].is_string());
    assert!(product["created"].is_string());
    assert!(product.get("seller_id").is_none());
}

#[tokio::test]
async fn product_payload_is_validated_per_field() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let token = app.token(&seller);

    let (status, body) = app
        .send(
            "POST",
            "/products/",
            Some(&token),
            Some(json!({ "price": "-1.00", "stock": -3, "name": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["data"]["fields"];
    assert!(fields["price"].is_array());
    assert!(fields["stock"].is_array());
    assert!(fields["name"].is_array());

    for price in ["1.234", "10000.00"] {
        let mut payload = product_body();
        payload["price"] = json!(price);
        let (status, body) = app.send("POST", "/products/", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{price}");
        assert!(body["data"]["fields"]["price"].is_array());
    }

    let (status, _) = app
        .send("POST", "/products/", Some(&token), Some(json!({ "name": "No price" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seller_only_sees_own_products() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let other = app.user("other", UserRole::Seller).await;
    let mut mine = Vec::new();
    for i in 0..5 {
        app.product(&other, &format!("Product {i}"), true).await;
        let product = app.product(&seller, &format!("Product {i}"), i != 0).await;
        mine.push(product.uuid.to_string());
    }
    mine.sort();

    let (status, body) = app.send("GET", "/products/", Some(&app.token(&seller)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uuids(&body["data"]), mine);
    assert_eq!(body["meta"]["total"], 5);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    app.product(&seller, "Only", true).await;

    let (status, body) = app
        .send(
            "GET",
            "/products/?page=100000000000000000&per_page=100",
            Some(&app.token(&seller)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn buyer_sees_active_products_of_every_seller() {
    let app = TestApp::new();
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let seller_a = app.user("seller_a", UserRole::Seller).await;
    let seller_b = app.user("seller_b", UserRole::Seller).await;
    let mut active = Vec::new();
    for i in 0..5 {
        app.product(&seller_a, &format!("Hidden {i}"), false).await;
        active.push(app.product(&seller_a, &format!("A {i}"), true).await.uuid.to_string());
        active.push(app.product(&seller_b, &format!("B {i}"), true).await.uuid.to_string());
    }
    active.sort();

    let (status, body) = app.send("GET", "/products/", Some(&app.token(&buyer)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uuids(&body["data"]), active);
    assert_eq!(body["meta"]["total"], 10);
}

#[tokio::test]
async fn product_listing_is_paginated() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    for i in 0..5 {
        app.product(&seller, &format!("Product {i}"), true).await;
    }

    let (status, body) = app
        .send("GET", "/products/?page=2&per_page=2", Some(&app.token(&seller)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Product 2", "Product 3"]);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["per_page"], 2);
    assert_eq!(body["meta"]["total"], 5);
}

#[tokio::test]
async fn retrieve_respects_visibility() {
    let app = TestApp::new();
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let seller = app.user("seller", UserRole::Seller).await;
    let other = app.user("other", UserRole::Seller).await;
    let active = app.product(&seller, "Active", true).await;
    let inactive = app.product(&seller, "Inactive", false).await;

    let buyer_token = app.token(&buyer);
    let (status, body) = app
        .send("GET", &format!("/products/{}/", active.uuid), Some(&buyer_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["uuid"], active.uuid.to_string());

    let (status, _) = app
        .send("GET", &format!("/products/{}/", inactive.uuid), Some(&buyer_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send("GET", &format!("/products/{}/", inactive.uuid), Some(&app.token(&seller)), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("GET", &format!("/products/{}/", active.uuid), Some(&app.token(&other)), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("GET", "/products/not-a-uuid/", Some(&buyer_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_mutations_are_always_denied() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let product = app.product(&seller, "Computer", true).await;
    let uri = format!("/products/{}/", product.uuid);
    let token = app.token(&seller);

    for method in ["PUT", "PATCH", "DELETE"] {
        let (status, _) = app.send(method, &uri, Some(&token), Some(product_body())).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method}");

        let (status, _) = app.send(method, &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method}");
    }
}

#[tokio::test]
async fn buyer_order_always_starts_in_cart() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let product = app.product(&seller, "Product Test", true).await;

    let (status, body) = app
        .send(
            "POST",
            "/orders/",
            Some(&app.token(&buyer)),
            Some(json!({
                "product": product.uuid,
                "units": 10,
                "buyer": buyer.uuid,
                "status": "payed",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let order = &body["data"];
    assert_eq!(order["status"], "cart");
    assert_eq!(order["product"], product.uuid.to_string());
    assert_eq!(order["buyer"], buyer.uuid.to_string());
    assert_eq!(order["units"], 10);
    assert!(order["modified"].is_null());
    assert!(order["created"].is_string());

    let (_, listed) = app.send("GET", "/orders/", Some(&app.token(&buyer)), None).await;
    assert_eq!(listed["data"][0]["status"], "cart");
}

#[tokio::test]
async fn order_payload_is_checked() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let other_buyer = app.user("other", UserRole::Buyer).await;
    let product = app.product(&seller, "Product Test", true).await;
    let token = app.token(&buyer);

    let (status, body) = app
        .send("POST", "/orders/", Some(&token), Some(json!({ "product": product.uuid, "units": 0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["units"].is_array());

    let (status, body) = app
        .send(
            "POST",
            "/orders/",
            Some(&token),
            Some(json!({ "product": uuid::Uuid::new_v4(), "units": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["product"].is_array());

    let (status, body) = app
        .send(
            "POST",
            "/orders/",
            Some(&token),
            Some(json!({ "product": product.uuid, "units": 1, "buyer": other_buyer.uuid })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["fields"]["buyer"].is_array());
}

#[tokio::test]
async fn buyer_cannot_order_a_hidden_product() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let inactive = app.product(&seller, "Retired", false).await;
    let token = app.token(&buyer);

    let (status, _) = app
        .send("GET", &format!("/products/{}/", inactive.uuid), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send("POST", "/orders/", Some(&token), Some(json!({ "product": inactive.uuid, "units": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Same answer as for a product that was never created.
    let (_, unknown) = app
        .send(
            "POST",
            "/orders/",
            Some(&token),
            Some(json!({ "product": uuid::Uuid::new_v4(), "units": 1 })),
        )
        .await;
    assert_eq!(body["data"]["fields"]["product"], unknown["data"]["fields"]["product"]);

    let (_, listed) = app.send("GET", "/orders/", Some(&token), None).await;
    assert_eq!(listed["data"], json!([]));
}

#[tokio::test]
async fn second_order_on_a_product_conflicts() {
    let app = TestApp::new();
    let seller = app.user("seller", UserRole::Seller).await;
    let buyer = app.user("buyer", UserRole::Buyer).await;
    let other = app.user("other", UserRole::Buyer).await;
    let product = app.product(&seller, "Product Test", true).await;

    let (status, _) = app
        .send(
            "POST",
            "/orders/",
            Some(&app.token(&buyer)),
            Some(json!({ "product": product.uuid, "units": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .send(
            "POST",
            "/orders/",
            Some(&app.token(&other)),
            Some(json!({ "product": product.uuid, "units": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn order_listing_is_scoped_by_role() {
    let app = TestApp::new();
    let seller_a = app.user("seller_a", UserRole::Seller).await;
    let seller_b = app.user("seller_b", UserRole::Seller).await;
    let buyer_1 = app.user("buyer_1", UserRole::Buyer).await;
    let buyer_2 = app.user("buyer_2", UserRole::Buyer).await;

    let p_a = app.product(&seller_a, "A", true).await;
    let p_b = app.product(&seller_b, "B", true).await;
    let p_a2 = app.product(&seller_a, "A2", true).await;

    let mut placed = Vec::new();
    for (buyer, product) in [(&buyer_1, &p_a), (&buyer_2, &p_b), (&buyer_2, &p_a2)] {
        let (status, body) = app
            .send(
                "POST",
                "/orders/",
                Some(&app.token(buyer)),
                Some(json!({ "product": product.uuid, "units": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        placed.push(body["data"]["uuid"].as_str().unwrap().to_string());
    }

    let sorted = |mut ids: Vec<String>| {
        ids.sort();
        ids
    };

    let (_, body) = app.send("GET", "/orders/", Some(&app.token(&buyer_1)), None).await;
    assert_eq!(uuids(&body["data"]), vec![placed[0].clone()]);

    let (_, body) = app.send("GET", "/orders/", Some(&app.token(&buyer_2)), None).await;
    assert_eq!(uuids(&body["data"]), sorted(vec![placed[1].clone(), placed[2].clone()]));

    let (_, body) = app.send("GET", "/orders/", Some(&app.token(&seller_a)), None).await;
    assert_eq!(uuids(&body["data"]), sorted(vec![placed[0].clone(), placed[2].clone()]));

    let (_, body) = app.send("GET", "/orders/", Some(&app.token(&seller_b)), None).await;
    assert_eq!(uuids(&body["data"]), vec![placed[1].clone()]);

    let (status, body) = app
        .send("GET", "/orders/?status=payed", Some(&app.token(&seller_a)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);
}
