//! Entity registry for collecting resource descriptors and their routes

use super::handlers::AppState;
use axum::Router;
use std::collections::HashMap;

/// Trait that describes how to build routes for a resource
///
/// Each resource (company, employee) implements this trait to provide its
/// routes over the shared [`AppState`].
pub trait EntityDescriptor: Send + Sync {
    /// The entity type name (singular, e.g., "company")
    fn entity_type(&self) -> &str;

    /// The plural form (e.g., "companies")
    fn plural(&self) -> &str;

    /// Build the routes for this resource
    fn build_routes(&self, state: AppState) -> Router;
}

/// Registry for all resources served by the application
#[derive(Default)]
pub struct EntityRegistry {
    descriptors: HashMap<String, Box<dyn EntityDescriptor>>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register an entity descriptor
    ///
    /// The entity type name is used as the key; registering the same type
    /// again replaces the previous descriptor.
    pub fn register(&mut self, descriptor: Box<dyn EntityDescriptor>) {
        let entity_type = descriptor.entity_type().to_string();
        self.descriptors.insert(entity_type, descriptor);
    }

    /// Build a router with all registered routes
    pub fn build_routes(&self, state: AppState) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes(state.clone()));
        }

        router
    }

    /// Get all registered entity types
    pub fn entity_types(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PagingConfig;
    use crate::server::handlers::{CompanyDescriptor, EmployeeDescriptor};
    use crate::storage::InMemoryStore;
    use std::sync::Arc;

    /// Minimal mock EntityDescriptor for testing
    struct MockDescriptor {
        entity_type: String,
        plural: String,
    }

    impl MockDescriptor {
        fn new(entity_type: &str, plural: &str) -> Self {
            Self {
                entity_type: entity_type.to_string(),
                plural: plural.to_string(),
            }
        }
    }

    impl EntityDescriptor for MockDescriptor {
        fn entity_type(&self) -> &str {
            &self.entity_type
        }

        fn plural(&self) -> &str {
            &self.plural
        }

        fn build_routes(&self, _state: AppState) -> Router {
            Router::new()
        }
    }

    fn state() -> AppState {
        AppState::new(Arc::new(InMemoryStore::new()), PagingConfig::default())
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = EntityRegistry::new();
        assert!(registry.entity_types().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_domain_descriptors() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(CompanyDescriptor));
        registry.register(Box::new(EmployeeDescriptor));

        let mut types = registry.entity_types();
        types.sort();
        assert_eq!(types, vec!["company", "employee"]);
    }

    #[test]
    fn test_register_duplicate_replaces() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(MockDescriptor::new("company", "companies")));
        registry.register(Box::new(MockDescriptor::new("company", "firms")));
        assert_eq!(registry.entity_types().len(), 1);
    }

    #[test]
    fn test_build_routes_with_entities() {
        let mut registry = EntityRegistry::new();
        registry.register(Box::new(CompanyDescriptor));
        registry.register(Box::new(EmployeeDescriptor));
        let _router = registry.build_routes(state());
    }
}
