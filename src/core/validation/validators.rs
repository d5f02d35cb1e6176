//! Field validators
//!
//! The boolean predicates are the building blocks; `clean_customer` and
//! `clean_product` combine them into full-entity validation returning the first
//! failing rule as a [`ValidationError`].

use crate::core::error::ValidationError;
use crate::entities::{Customer, Product};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;
use validator::ValidateEmail;

fn phone_regex() -> Option<&'static Regex> {
    static PHONE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    PHONE_REGEX
        .get_or_init(|| Regex::new(r"^(\+\d{1,15}|\d{3}-\d{3}-\d{4})$").ok())
        .as_ref()
}

/// Phone is valid when absent, empty, `+<1-15 digits>` or `DDD-DDD-DDDD`
pub fn validate_phone(phone: Option<&str>) -> bool {
    match phone {
        None | Some("") => true,
        Some(p) => phone_regex().is_some_and(|re| re.is_match(p)),
    }
}

/// Price must be strictly positive
pub fn validate_price(price: Decimal) -> bool {
    price > Decimal::ZERO
}

/// Stock must not be negative
pub fn validate_stock(stock: i32) -> bool {
    stock >= 0
}

/// Syntactic email check
pub fn validate_email(email: &str) -> bool {
    email.validate_email()
}

fn required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required {
            field: field.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Run every field rule for a customer
pub fn clean_customer(customer: &Customer) -> Result<(), ValidationError> {
    required("name", &customer.name)?;
    required("email", &customer.email)?;

    if !validate_email(&customer.email) {
        return Err(ValidationError::InvalidEmail {
            value: customer.email.clone(),
        });
    }

    if !validate_phone(customer.phone.as_deref()) {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(())
}

/// Run every field rule for a product
pub fn clean_product(product: &Product) -> Result<(), ValidationError> {
    if !validate_price(product.price) {
        return Err(ValidationError::NonPositivePrice);
    }

    if !validate_stock(product.stock) {
        return Err(ValidationError::NegativeStock);
    }

    required("name", &product.name)
}
