//! Entity trait shared by the stored records

use uuid::Uuid;

/// A stored record addressable by id under a REST resource path
///
/// The resource names drive route paths, `Location` headers and not-found
/// messages.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "companies")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "company")
    fn resource_name_singular() -> &'static str;

    /// Type name used in error payloads (e.g., "Company")
    fn entity_type() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;
}
