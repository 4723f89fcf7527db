//! Server module for building the HTTP application
//!
//! The `ServerBuilder` assembles:
//! - Health check routes
//! - Company and employee routes from the entity registry
//! - CORS and request tracing layers

pub mod builder;
pub mod entity_registry;
pub mod handlers;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use handlers::AppState;
