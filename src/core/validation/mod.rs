//! Validation and input normalization
//!
//! Validators are pure predicates over field values; `clean_*` functions run the
//! full set of field rules over an entity before it is persisted. Filters normalize
//! raw input (trimming, empty-to-absent) before validation sees it.

pub mod filters;
pub mod validators;

pub use validators::{
    clean_customer, clean_product, validate_email, validate_phone, validate_price,
    validate_stock,
};
