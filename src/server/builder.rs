//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::{GraphQLExposure, RestExposure};
use crate::config::{CrmConfig, InventoryConfig};
use crate::core::store::EntityStore;
use crate::handlers::CrmService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the CRM HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryStore::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn EntityStore>>,
    inventory: InventoryConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            inventory: InventoryConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the entity store (required)
    pub fn with_store(mut self, store: impl EntityStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared entity store
    pub fn with_shared_store(mut self, store: Arc<dyn EntityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Take the inventory settings from a loaded configuration
    pub fn with_config(mut self, config: &CrmConfig) -> Self {
        self.inventory = config.inventory;
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the service the API layer runs on
    pub fn build_service(&mut self) -> Result<CrmService> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("EntityStore is required. Call .with_store()"))?;

        Ok(CrmService::new(store).with_inventory(self.inventory))
    }

    /// Build the final router: GraphQL, health checks and custom routes
    pub fn build(mut self) -> Result<Router> {
        let service = self.build_service()?;
        let custom_routes = std::mem::take(&mut self.custom_routes);

        let app = RestExposure::build_router(custom_routes)
            .merge(GraphQLExposure::build_router(service))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        Ok(app)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
