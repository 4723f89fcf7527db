//! Data shaping: project records down to a requested set of fields
//!
//! The `fields` query parameter is a comma separated list of attribute
//! names. Names are resolved through the record's field catalog; unknown
//! names are skipped. The identifier attribute is always part of the output.

use crate::core::field::FieldValue;
use crate::core::record::{FieldDescriptor, Record};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// A record projected to a subset of its attributes, keyed by canonical name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapedEntity(IndexMap<String, FieldValue>);

impl ShapedEntity {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Entries in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in output order
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, key: &str, value: FieldValue) {
        self.0.insert(key.to_string(), value);
    }
}

/// Projects records of type `T` according to a `fields` string
///
/// Stateless; the accessors come from `T`'s static catalog and are resolved
/// once per call, not once per record.
#[derive(Debug)]
pub struct FieldShaper<T> {
    _record: PhantomData<fn(&T)>,
}

impl<T> Clone for FieldShaper<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldShaper<T> {}

impl<T> Default for FieldShaper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldShaper<T> {
    pub const fn new() -> Self {
        Self {
            _record: PhantomData,
        }
    }
}

impl<T: Record> FieldShaper<T> {
    /// Shape every record, preserving input order
    pub fn shape_data<'a, I>(&self, records: I, fields: Option<&str>) -> Vec<ShapedEntity>
    where
        I: IntoIterator<Item = &'a T>,
    {
        let selected = Self::required_fields(fields);
        records
            .into_iter()
            .map(|record| Self::project(record, &selected))
            .collect()
    }

    /// Shape a single record
    pub fn shape_one(&self, record: &T, fields: Option<&str>) -> ShapedEntity {
        Self::project(record, &Self::required_fields(fields))
    }

    /// Resolve the attributes to emit, identifier first, without duplicates
    ///
    /// An empty or blank `fields` string selects every attribute.
    pub fn required_fields(fields: Option<&str>) -> Vec<FieldDescriptor<T>> {
        let catalog = T::catalog();

        let requested: Vec<FieldDescriptor<T>> = match fields.filter(|f| !f.trim().is_empty()) {
            None => catalog.fields().to_vec(),
            Some(fields) => fields
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .filter_map(|name| catalog.resolve(name).copied())
                .collect(),
        };

        let mut selected: Vec<FieldDescriptor<T>> = Vec::with_capacity(requested.len() + 1);
        if let Some(identifier) = catalog.resolve(T::IDENTIFIER) {
            selected.push(*identifier);
        }
        for field in requested {
            if !selected.iter().any(|s| s.name() == field.name()) {
                selected.push(field);
            }
        }

        selected
    }

    fn project(record: &T, selected: &[FieldDescriptor<T>]) -> ShapedEntity {
        let mut shaped = ShapedEntity::new();
        for field in selected {
            shaped.insert(field.name(), field.read(record));
        }
        shaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Clone)]
    struct Dto {
        id: Uuid,
        name: String,
        age: u32,
        salary: f64,
    }

    crate::impl_record!(Dto, {
        "Id" => id,
        "Name" => name,
        "Age" => age,
        "Salary" => salary,
    });

    fn dto(name: &str) -> Dto {
        Dto {
            id: Uuid::new_v4(),
            name: name.to_string(),
            age: 30,
            salary: 1000.0,
        }
    }

    #[test]
    fn test_no_fields_projects_everything() {
        let shaper = FieldShaper::<Dto>::new();
        let shaped = shaper.shape_one(&dto("Ann"), None);
        assert_eq!(shaped.keys(), vec!["Id", "Name", "Age", "Salary"]);

        let shaped = shaper.shape_one(&dto("Ann"), Some("  "));
        assert_eq!(shaped.len(), 4);
    }

    #[test]
    fn test_requested_fields_with_identifier() {
        let shaped = FieldShaper::<Dto>::new().shape_one(&dto("Ann"), Some("name, age"));
        assert_eq!(shaped.keys(), vec!["Id", "Name", "Age"]);
        assert_eq!(shaped.get("Name"), Some(&FieldValue::from("Ann")));
    }

    #[test]
    fn test_identifier_always_present() {
        let record = dto("Ann");
        for fields in ["salary", "bogus", ",,", "ID", "name,id"] {
            let shaped = FieldShaper::<Dto>::new().shape_one(&record, Some(fields));
            assert_eq!(shaped.get("Id"), Some(&FieldValue::Uuid(record.id)), "{fields}");
        }
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let shaped = FieldShaper::<Dto>::new().shape_one(&dto("Ann"), Some("height,name"));
        assert_eq!(shaped.keys(), vec!["Id", "Name"]);
    }

    #[test]
    fn test_duplicate_fields_collapse() {
        let shaper = FieldShaper::<Dto>::new();
        let once = shaper.shape_one(&dto("Ann"), Some("Name"));
        let twice = shaper.shape_one(&dto("Ann"), Some("Name,name"));
        assert_eq!(once.keys(), twice.keys());
        assert_eq!(twice.keys(), vec!["Id", "Name"]);
    }

    #[test]
    fn test_shape_data_preserves_order() {
        let records = vec![dto("Cy"), dto("Al"), dto("Bo")];
        let shaped = FieldShaper::<Dto>::new().shape_data(&records, Some("name"));
        let names: Vec<&str> = shaped
            .iter()
            .map(|s| s.get("Name").and_then(FieldValue::as_string).unwrap())
            .collect();
        assert_eq!(names, vec!["Cy", "Al", "Bo"]);
    }

    #[test]
    fn test_serializes_as_object() {
        let record = dto("Ann");
        let shaped = FieldShaper::<Dto>::new().shape_one(&record, Some("age"));
        let json = serde_json::to_value(&shaped).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "Id": record.id.to_string(), "Age": 30 })
        );
    }
}
