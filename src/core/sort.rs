//! Ordering built from an `orderBy` query string
//!
//! `orderBy` is a comma separated list of `field[ desc]` tokens. Each field is
//! matched against the record's [`FieldCatalog`](crate::core::record::FieldCatalog);
//! unknown fields are dropped. The result is a typed [`SortSpec`] applied with
//! a stable multi-key comparator, never a textual query.

use crate::core::record::{FieldDescriptor, Record};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Sort direction of a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One `(field, direction)` pair of a [`SortSpec`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    /// Canonical field name
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered list of sort keys; the first key takes precedence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Build the ordering for `T` from a raw `orderBy` string
    ///
    /// Falls back to `default_field` ascending when the string is empty or
    /// none of its tokens resolve. Duplicate fields are kept in order.
    pub fn parse<T: Record>(order_by: Option<&str>, default_field: &str) -> Self {
        let fallback = || Self::new(vec![SortKey::asc(default_field)]);

        let Some(order_by) = order_by.filter(|s| !s.trim().is_empty()) else {
            return fallback();
        };

        let catalog = T::catalog();
        let keys: Vec<SortKey> = order_by
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| {
                let (candidate, rest) = match token.split_once(char::is_whitespace) {
                    Some((candidate, rest)) => (candidate, rest.trim()),
                    None => (token, ""),
                };

                let field = catalog.canonical_name(candidate)?;
                let direction = if rest == "desc" {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };

                Some(SortKey {
                    field: field.to_string(),
                    direction,
                })
            })
            .collect();

        if keys.is_empty() {
            fallback()
        } else {
            Self::new(keys)
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compile the keys into a comparator for `T`
    ///
    /// Keys naming attributes `T` does not have are skipped.
    pub fn comparator<T: Record>(&self) -> impl Fn(&T, &T) -> Ordering + use<T> {
        let catalog = T::catalog();
        let compiled: Vec<(FieldDescriptor<T>, SortDirection)> = self
            .keys
            .iter()
            .filter_map(|key| {
                catalog
                    .resolve(&key.field)
                    .map(|field| (*field, key.direction))
            })
            .collect();

        move |a: &T, b: &T| {
            for (field, direction) in &compiled {
                let ordering = field.read(a).compare(&field.read(b));
                let ordering = match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        }
    }

    /// Sort records in place; ties keep their original relative order
    pub fn apply<T: Record>(&self, records: &mut [T]) {
        let compare = self.comparator::<T>();
        records.sort_by(|a, b| compare(a, b));
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .keys
            .iter()
            .map(|key| match key.direction {
                SortDirection::Asc => format!("{} ascending", key.field),
                SortDirection::Desc => format!("{} descending", key.field),
            })
            .collect();
        write!(f, "{}", rendered.join(", "))
    }
}
