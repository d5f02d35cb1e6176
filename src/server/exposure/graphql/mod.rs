//! GraphQL API exposure
//!
//! Serves the static [`CrmSchema`] over axum: queries and mutations on
//! `POST /graphql`, an interactive playground and the SDL export.

mod schema;
mod types;

pub use schema::{CrmSchema, MutationRoot, QueryRoot, build_schema};

use crate::handlers::CrmService;
use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Router,
    extract::Extension,
    response::{Html, IntoResponse},
    routing::{get, post},
};

/// GraphQL API exposure implementation
pub struct GraphQLExposure;

impl GraphQLExposure {
    /// Build the GraphQL router
    ///
    /// Routes:
    /// - `POST /graphql`: queries and mutations
    /// - `GET /graphql/playground`: interactive playground
    /// - `GET /graphql/schema`: SDL of the schema
    pub fn build_router(service: CrmService) -> Router {
        let schema = build_schema(service);

        Router::new()
            .route("/graphql", post(graphql_handler))
            .route("/graphql/playground", get(graphql_playground))
            .route("/graphql/schema", get(graphql_schema))
            .layer(Extension(schema))
    }
}

async fn graphql_handler(
    Extension(schema): Extension<CrmSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

async fn graphql_schema(Extension(schema): Extension<CrmSchema>) -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; charset=utf-8",
        )],
        schema.sdl(),
    )
}
