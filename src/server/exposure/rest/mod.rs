//! REST routes that sit beside the GraphQL API

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router: health checks plus any custom routes
    pub fn build_router(custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes();

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "crm-rs"
        }))
    }
}
