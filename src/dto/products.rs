use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Product;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1 to 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub description: String,
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub stock: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Prices are NUMERIC(6, 2): non-negative, two decimals, below 10 000.
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        return Err(ValidationError::new("min").with_message("must not be negative".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(
            ValidationError::new("decimal_places")
                .with_message("must have at most 2 decimal places".into()),
        );
    }
    if *price >= Decimal::new(10_000, 0) {
        return Err(
            ValidationError::new("max_digits").with_message("must have at most 6 digits".into()),
        );
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
pub struct ProductList {
    pub items: Vec<Product>,
}
