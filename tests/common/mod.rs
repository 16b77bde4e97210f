#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use marketplace_api::{
    models::{Product, Sex, User, UserRole},
    routes::create_api_router,
    state::AppState,
    store::{MemoryStore, NewProduct, NewUser},
    token::TokenService,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            TokenService::new("test-secret", 1).expect("token service"),
        );
        let router = create_api_router().with_state(state.clone());
        Self { state, router }
    }

    pub async fn user(&self, username: &str, role: UserRole) -> User {
        self.state
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@test.com"),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: "dummy".into(),
                sex: Sex::Male,
                role,
            })
            .await
            .expect("insert user")
    }

    pub async fn product(&self, seller: &User, name: &str, is_active: bool) -> Product {
        self.state
            .store
            .insert_product(NewProduct {
                name: name.to_string(),
                description: String::new(),
                price: Decimal::new(10, 0),
                stock: 10,
                is_active,
                seller_id: seller.id,
            })
            .await
            .expect("insert product")
    }

    pub fn token(&self, user: &User) -> String {
        self.state.tokens.issue(user).expect("issue token")
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}

pub fn uuids(data: &Value) -> Vec<String> {
    let mut ids: Vec<String> = data
        .as_array()
        .expect("array data")
        .iter()
        .map(|item| item["uuid"].as_str().expect("uuid").to_string())
        .collect();
    ids.sort();
    ids
}
