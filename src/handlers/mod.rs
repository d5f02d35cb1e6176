//! Mutation handlers and read queries over an entity store
//!
//! [`CrmService`] is the single entry point the API layer talks to. Each
//! mutation has a `try_*` form returning `CrmResult<T>` and a response form that
//! folds the error into a [`MutationResponse`] and never fails.

pub mod inputs;
pub mod mutations;
pub mod queries;
pub mod response;

pub use inputs::{CustomerInput, OrderInput, ProductInput};
pub use response::{BulkCreateResponse, MutationResponse};

use crate::config::InventoryConfig;
use crate::core::entity::EntityId;
use crate::core::store::EntityStore;
use std::sync::Arc;

/// Business operations over a shared entity store
#[derive(Clone)]
pub struct CrmService {
    store: Arc<dyn EntityStore>,
    inventory: InventoryConfig,
}

impl CrmService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            inventory: InventoryConfig::default(),
        }
    }

    /// Override the low-stock threshold and restock increment
    pub fn with_inventory(mut self, inventory: InventoryConfig) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    pub fn inventory(&self) -> &InventoryConfig {
        &self.inventory
    }
}

/// Parse an API id; anything that is not a positive integer is `None`
pub fn parse_id(raw: &str) -> Option<EntityId> {
    raw.trim().parse::<EntityId>().ok().filter(|id| *id > 0)
}
