//! Core module containing the domain rules, store traits and shared types

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod filters;
pub mod query;
pub mod store;
pub mod validation;

pub use aggregate::{compute_order_total, order_total, total_revenue};
pub use entity::{Entity, EntityId};
pub use error::{CrmError, CrmResult, NotFoundError, StorageError, StoreResult, ValidationError};
pub use filters::{CustomerFilter, FilterSet, OrderFilter, ProductFilter, Sortable};
pub use query::{OrderBy, Page, PageRequest};
pub use store::{EntityStore, StoreReader, StoreTransaction};
