//! Result records returned by mutation handlers

use crate::core::error::CrmError;
use crate::entities::Customer;
use serde::Serialize;

/// Outcome of a single-entity mutation
///
/// `success` is true iff `payload` is present. On failure `message` carries the
/// user-visible error text and `error_code` the kind of failure.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse<T> {
    pub payload: Option<T>,
    pub message: String,
    pub success: bool,
    pub error_code: Option<String>,
}

impl<T> MutationResponse<T> {
    pub fn ok(payload: T, message: impl Into<String>) -> Self {
        Self {
            payload: Some(payload),
            message: message.into(),
            success: true,
            error_code: None,
        }
    }

    pub fn failed(err: &CrmError) -> Self {
        Self {
            payload: None,
            message: err.user_message(),
            success: false,
            error_code: Some(err.error_code().to_string()),
        }
    }
}

/// Outcome of a bulk customer import
///
/// Rows succeed or fail independently; `success_count` and `error_count` always
/// equal the lengths of `customers` and `errors`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkCreateResponse {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
    pub success_count: usize,
    pub error_count: usize,
}

impl BulkCreateResponse {
    pub fn new(customers: Vec<Customer>, errors: Vec<String>) -> Self {
        Self {
            success_count: customers.len(),
            error_count: errors.len(),
            customers,
            errors,
        }
    }
}
