//! Static field catalogs for records and DTOs
//!
//! Every type that can be sorted or shaped from a query string exposes a
//! [`FieldCatalog`]: its public attribute names in declaration order, each
//! paired with a compiled accessor. Client supplied names are only ever
//! matched against this allow-list, never interpreted as code or query text.

use crate::core::field::FieldValue;
use std::collections::HashMap;
use std::fmt;

/// Compiled accessor reading one attribute of a record
pub type Accessor<T> = fn(&T) -> FieldValue;

/// One public attribute of a record type
pub struct FieldDescriptor<T> {
    name: &'static str,
    accessor: Accessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// Canonical (declared) spelling of the attribute
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Read the attribute from a record
    pub fn read(&self, record: &T) -> FieldValue {
        (self.accessor)(record)
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldDescriptor<T> {}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

/// Allow-list of attribute names for a record type
///
/// Lookups are case-insensitive and ignore surrounding whitespace.
pub struct FieldCatalog<T> {
    fields: Vec<FieldDescriptor<T>>,
    by_key: HashMap<String, usize>,
}

impl<T> FieldCatalog<T> {
    /// Build a catalog from `(canonical name, accessor)` pairs in declaration order
    ///
    /// When two names collide case-insensitively the first declaration wins.
    pub fn new(fields: Vec<(&'static str, Accessor<T>)>) -> Self {
        let fields: Vec<FieldDescriptor<T>> = fields
            .into_iter()
            .map(|(name, accessor)| FieldDescriptor { name, accessor })
            .collect();

        let mut by_key = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            by_key.entry(field.name.to_lowercase()).or_insert(index);
        }

        Self { fields, by_key }
    }

    /// Resolve a client supplied attribute name
    ///
    /// Returns `None` for unknown names; that is a normal outcome, not an error.
    pub fn resolve(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        let key = name.trim();
        if key.is_empty() {
            return None;
        }

        self.by_key
            .get(&key.to_lowercase())
            .map(|&index| &self.fields[index])
    }

    /// Resolve a name to its canonical spelling
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        self.resolve(name).map(FieldDescriptor::name)
    }

    /// All attributes in declaration order
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Canonical attribute names in declaration order
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldDescriptor::name).collect()
    }
}

impl<T> fmt::Debug for FieldCatalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

/// A type whose attributes can be resolved by name at request time
///
/// Implemented through [`impl_record!`](crate::impl_record), which builds the
/// catalog once per type on first use.
pub trait Record: Sized + 'static {
    /// Attribute that shaping always includes
    const IDENTIFIER: &'static str = "Id";

    /// The process-wide field catalog of this type
    fn catalog() -> &'static FieldCatalog<Self>;

    /// Read an attribute by (case-insensitive) name
    fn field_value(&self, name: &str) -> Option<FieldValue> {
        Self::catalog().resolve(name).map(|field| field.read(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Clone)]
    struct Sample {
        id: Uuid,
        name: String,
        age: u32,
    }

    crate::impl_record!(Sample, {
        "Id" => id,
        "Name" => name,
        "Age" => age,
    });

    fn sample() -> Sample {
        Sample {
            id: Uuid::nil(),
            name: "Sam".to_string(),
            age: 41,
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let catalog = Sample::catalog();
        assert_eq!(catalog.canonical_name("name"), Some("Name"));
        assert_eq!(catalog.canonical_name("NAME"), Some("Name"));
        assert_eq!(catalog.canonical_name("  aGe "), Some("Age"));
    }

    #[test]
    fn test_unknown_name_is_none() {
        let catalog = Sample::catalog();
        assert_eq!(catalog.canonical_name("salary"), None);
        assert_eq!(catalog.canonical_name(""), None);
        assert_eq!(catalog.canonical_name("   "), None);
    }

    #[test]
    fn test_names_keep_declaration_order() {
        assert_eq!(Sample::catalog().names(), vec!["Id", "Name", "Age"]);
    }

    #[test]
    fn test_field_value_reads_through_accessor() {
        let p = sample();
        assert_eq!(p.field_value("age"), Some(FieldValue::Integer(41)));
        assert_eq!(
            p.field_value("Name"),
            Some(FieldValue::String("Sam".to_string()))
        );
        assert_eq!(p.field_value("missing"), None);
    }

    #[test]
    fn test_first_declaration_wins_on_collision() {
        let catalog: FieldCatalog<Sample> = FieldCatalog::new(vec![
            (
                "Name",
                (|p: &Sample| FieldValue::from(p.name.clone())) as Accessor<Sample>,
            ),
            ("NAME", (|_: &Sample| FieldValue::Null) as Accessor<Sample>),
        ]);
        let field = catalog.resolve("name").unwrap();
        assert_eq!(field.name(), "Name");
        assert_eq!(field.read(&sample()), FieldValue::from("Sam"));
    }
}
