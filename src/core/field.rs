//! Field value types and ordering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// A polymorphic field value read from a record through its field catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a UUID if possible
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            FieldValue::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Total ordering used by multi-key sorting.
    ///
    /// Values of the same variant compare naturally (floats via `total_cmp`).
    /// `Null` sorts before everything else; mixed variants fall back to a
    /// fixed variant rank so the comparator stays consistent.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;

        match (self, other) {
            (String(a), String(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)),
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Uuid(a), Uuid(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::String(_) => 3,
            FieldValue::Uuid(_) => 4,
            FieldValue::DateTime(_) => 5,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_integer() {
        let value = FieldValue::from(42u32);
        assert_eq!(value.as_integer(), Some(42));
        assert_eq!(value.as_string(), None);
    }

    #[test]
    fn test_option_none_is_null() {
        let value = FieldValue::from(None::<String>);
        assert!(value.is_null());
    }

    #[test]
    fn test_compare_same_variant() {
        assert_eq!(
            FieldValue::from("Alice").compare(&FieldValue::from("Bob")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from(30u32).compare(&FieldValue::from(25u32)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Float(1.5).compare(&FieldValue::Float(1.5)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_compare_mixed_numeric() {
        assert_eq!(
            FieldValue::Integer(2).compare(&FieldValue::Float(2.5)),
            Ordering::Less
        );
    }

    #[test]
    fn test_null_sorts_first() {
        assert_eq!(
            FieldValue::Null.compare(&FieldValue::from("a")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from(1u32).compare(&FieldValue::Null),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_datetimes() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::seconds(5);
        assert_eq!(
            FieldValue::from(earlier).compare(&FieldValue::from(later)),
            Ordering::Less
        );
    }

    #[test]
    fn test_untagged_serialization() {
        let id = Uuid::nil();
        assert_eq!(
            serde_json::to_value(FieldValue::from(id)).unwrap(),
            serde_json::json!("00000000-0000-0000-0000-000000000000")
        );
        assert_eq!(
            serde_json::to_value(FieldValue::from(27u32)).unwrap(),
            serde_json::json!(27)
        );
        assert_eq!(
            serde_json::to_value(FieldValue::Null).unwrap(),
            serde_json::Value::Null
        );
    }
}
