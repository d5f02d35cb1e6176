//! Server module for building the HTTP API
//!
//! `ServerBuilder` wires an entity store into the GraphQL exposure and adds the
//! health check routes, request tracing and CORS.

pub mod builder;
pub mod exposure;

pub use builder::ServerBuilder;
pub use exposure::{CrmSchema, GraphQLExposure, RestExposure};
