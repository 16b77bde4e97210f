use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Sex, UserRole};

#[derive(Deserialize, Debug, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150, message = "must be 1 to 150 characters"))]
    pub username: Option<String>,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default, rename = "type")]
    pub role: UserRole,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
