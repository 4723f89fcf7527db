//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{EntityDescriptor, EntityRegistry};
use super::handlers::{AppState, CompanyDescriptor, EmployeeDescriptor};
use crate::config::{AppConfig, CorsConfig};
use crate::core::PAGINATION_HEADER;
use crate::core::service::RepositoryProvider;
use anyhow::{Context, Result};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Builder for the HTTP application
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(AppConfig::default())
///     .with_repository(InMemoryStore::with_seed_data())
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    repositories: Option<Arc<dyn RepositoryProvider>>,
    entity_registry: EntityRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the company and employee resources
    pub fn new() -> Self {
        let mut entity_registry = EntityRegistry::new();
        entity_registry.register(Box::new(CompanyDescriptor));
        entity_registry.register(Box::new(EmployeeDescriptor));

        Self {
            config: AppConfig::default(),
            repositories: None,
            entity_registry,
            custom_routes: Vec::new(),
        }
    }

    /// Use the given configuration instead of the defaults
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the repository provider (required)
    pub fn with_repository(mut self, repositories: impl RepositoryProvider + 'static) -> Self {
        self.repositories = Some(Arc::new(repositories));
        self
    }

    /// Register an additional resource
    pub fn register(mut self, descriptor: impl EntityDescriptor + 'static) -> Self {
        self.entity_registry.register(Box::new(descriptor));
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the final router: health, resources, CORS and request tracing
    pub fn build(self) -> Result<Router> {
        self.config.validate()?;

        let repositories = self.repositories.ok_or_else(|| {
            anyhow::anyhow!("A repository is required. Call .with_repository()")
        })?;
        let state = AppState::new(repositories, self.config.paging.clone());

        let mut app = health_routes().merge(self.entity_registry.build_routes(state));
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&self.config.cors)?),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr`, or to the configured address when `addr` is `None`,
    /// and stops on SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: Option<&str>) -> Result<()> {
        let addr = addr
            .map(str::to_string)
            .unwrap_or_else(|| self.config.server.address());
        let app = self.build()?;
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

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

fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "roster"
    }))
}

/// CORS policy exposing the pagination header to browsers
fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("x-pagination")]);

    if config.allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(header = PAGINATION_HEADER, ?origins, "CORS restricted");
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    #[test]
    fn test_build_without_repository_fails() {
        let err = ServerBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("with_repository"));
    }

    #[test]
    fn test_build_with_repository() {
        let router = ServerBuilder::new()
            .with_repository(InMemoryStore::new())
            .build();
        assert!(router.is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.paging.max_page_size = 0;

        let result = ServerBuilder::new()
            .with_config(config)
            .with_repository(InMemoryStore::new())
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_restricted_origins() {
        let config = CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        };
        assert!(cors_layer(&config).is_ok());

        let config = CorsConfig {
            allowed_origins: vec!["bad\norigin".to_string()],
        };
        assert!(cors_layer(&config).is_err());
    }

    #[test]
    fn test_default_registers_both_resources() {
        let builder = ServerBuilder::new();
        let mut types = builder.entity_registry.entity_types();
        types.sort();
        assert_eq!(types, vec!["company", "employee"]);
    }
}
