//! API Exposure modules for different protocols
//!
//! Each exposure produces an axum Router; the builder merges them.

pub mod graphql;
pub mod rest;

pub use graphql::{CrmSchema, GraphQLExposure, build_schema};
pub use rest::RestExposure;
