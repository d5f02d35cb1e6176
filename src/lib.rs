//! # crm-rs
//!
//! A customer-relationship-management backend: customers, products and orders
//! behind a GraphQL API, plus scheduled jobs that call that API.
//!
//! ## Features
//!
//! - **Validated mutations**: create customers (one or in bulk), products and
//!   orders; every outcome is a result record, never a panic
//! - **Derived order totals**: computed from product prices inside the same
//!   transaction that attaches the products
//! - **Low-stock remediation**: restock every product below a threshold
//! - **Filterable queries**: per-entity filter sets, Django-style ordering and
//!   offset pagination
//! - **Pluggable storage**: the core only sees the `EntityStore` traits
//! - **Jobs**: heartbeat, order reminders, restock and weekly report
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crm::prelude::*;
//!
//! let service = CrmService::new(Arc::new(InMemoryStore::new()));
//!
//! let response = service
//!     .create_product(ProductInput {
//!         name: "Laptop".to_string(),
//!         price: Decimal::new(99999, 2),
//!         stock: Some(3),
//!     })
//!     .await;
//! assert!(response.success);
//!
//! ServerBuilder::new()
//!     .with_store(InMemoryStore::new())
//!     .serve("127.0.0.1:8000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod handlers;
#[cfg(feature = "jobs")]
pub mod jobs;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        aggregate::{compute_order_total, order_total, total_revenue},
        entity::{Entity, EntityId},
        error::{CrmError, CrmResult, NotFoundError, StorageError, ValidationError},
        filters::{CustomerFilter, FilterSet, OrderFilter, ProductFilter},
        query::{OrderBy, Page, PageRequest},
        store::{EntityStore, StoreReader, StoreTransaction},
    };

    // === Macros ===
    pub use crate::impl_data_entity;

    // === Entities ===
    pub use crate::entities::{Customer, Order, Product};

    // === Handlers ===
    pub use crate::handlers::{
        BulkCreateResponse, CrmService, CustomerInput, MutationResponse, OrderInput, ProductInput,
        queries::ListQuery,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Config ===
    pub use crate::config::{CrmConfig, InventoryConfig, JobsConfig, ServerConfig};

    // === Server ===
    pub use crate::server::{CrmSchema, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
