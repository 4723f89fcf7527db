//! Query parameters for paging, sorting, shaping and filtering

use crate::config::PagingConfig;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use std::fmt;
use std::num::IntErrorKind;

/// Page size used when the request does not name one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound applied to every requested page size
pub const MAX_PAGE_SIZE: usize = 50;

/// Paging, sorting and shaping parameters shared by collection endpoints
///
/// Extracted from the query string with camelCase names. Raw values are kept
/// as received; the accessors apply clamping, so out-of-range input never
/// reaches the windowing code.
///
/// # Example
/// ```rust,ignore
/// // In handler:
/// pub async fn list_items(
///     Query(params): Query<RequestParameters>,
/// ) -> Json<Vec<ShapedEntity>> {
///     // params.page_number() defaults to 1
///     // params.page_size() defaults to 10, never exceeds 50
/// }
///
/// // Usage:
/// GET /items?pageNumber=2&pageSize=10
/// GET /items?orderBy=age desc,name&fields=name,age
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestParameters {
    /// Requested page number (1-indexed)
    #[serde(deserialize_with = "saturating_page_number")]
    pub page_number: i64,

    /// Requested page size
    #[serde(deserialize_with = "saturating_page_size")]
    pub page_size: Option<i64>,

    /// Comma separated `field[ desc]` tokens
    pub order_by: Option<String>,

    /// Comma separated field names to project
    pub fields: Option<String>,

    #[serde(skip)]
    default_page_size: usize,

    #[serde(skip)]
    max_page_size: usize,
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: None,
            order_by: None,
            fields: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl RequestParameters {
    pub fn new(page_number: i64, page_size: i64) -> Self {
        Self {
            page_number,
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Apply configured paging bounds
    pub fn with_paging(mut self, paging: &PagingConfig) -> Self {
        self.max_page_size = paging.max_page_size.max(1);
        self.default_page_size = paging.default_page_size.clamp(1, self.max_page_size);
        self
    }

    /// Get page number, ensuring minimum of 1
    pub fn page_number(&self) -> usize {
        usize::try_from(self.page_number).unwrap_or(0).max(1)
    }

    /// Get page size, clamped to `[1, max_page_size]`
    pub fn page_size(&self) -> usize {
        let max = self.max_page_size.max(1);
        match self.page_size {
            Some(size) => usize::try_from(size).unwrap_or(0).clamp(1, max),
            None => self.default_page_size.clamp(1, max),
        }
    }

    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }
}

/// Integers that overflow `i64` saturate instead of failing, so the
/// accessors can clamp them like any other out-of-range value.
struct SaturatingI64;

impl<'de> Visitor<'de> for SaturatingI64 {
    type Value = Option<i64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(i64::try_from(v).unwrap_or(i64::MAX)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<i64>() {
            Ok(n) => Ok(Some(n)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
                IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
                _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
            },
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

// An empty `pageNumber=` means the first page.
fn saturating_page_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(deserializer.deserialize_any(SaturatingI64)?.unwrap_or(1))
}

fn saturating_page_size<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    deserializer.deserialize_any(SaturatingI64)
}

/// Age bounds accepted by the employee collection endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgeRange {
    pub min_age: u32,
    pub max_age: u32,
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            min_age: 0,
            max_age: u32::MAX,
        }
    }
}

impl AgeRange {
    pub fn new(min_age: u32, max_age: u32) -> Self {
        Self { min_age, max_age }
    }

    /// The range is usable only when `max_age > min_age`
    pub fn is_valid(&self) -> bool {
        self.max_age > self.min_age
    }

    /// Inclusive bound check
    pub fn contains(&self, age: u32) -> bool {
        age >= self.min_age && age <= self.max_age
    }
}

/// Everything the employee collection query consumes
#[derive(Debug, Clone, Default)]
pub struct EmployeeParameters {
    pub request: RequestParameters,
    pub ages: AgeRange,
}

impl EmployeeParameters {
    pub fn new(request: RequestParameters, ages: AgeRange) -> Self {
        Self { request, ages }
    }

    pub fn valid_age_range(&self) -> bool {
        self.ages.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parameters_defaults() {
        let params = RequestParameters::default();
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), 10);
        assert_eq!(params.order_by(), None);
        assert_eq!(params.fields(), None);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(RequestParameters::new(1, 500).page_size(), 50);
        assert_eq!(RequestParameters::new(1, 0).page_size(), 1);
        assert_eq!(RequestParameters::new(1, -7).page_size(), 1);
        assert_eq!(RequestParameters::new(1, 25).page_size(), 25);
    }

    #[test]
    fn test_page_number_is_clamped() {
        assert_eq!(RequestParameters::new(0, 10).page_number(), 1);
        assert_eq!(RequestParameters::new(-3, 10).page_number(), 1);
        assert_eq!(RequestParameters::new(4, 10).page_number(), 4);
    }

    #[test]
    fn test_configured_paging_bounds() {
        let paging = PagingConfig {
            default_page_size: 5,
            max_page_size: 20,
        };
        let params = RequestParameters::default().with_paging(&paging);
        assert_eq!(params.page_size(), 5);

        let params = RequestParameters::new(1, 100).with_paging(&paging);
        assert_eq!(params.page_size(), 20);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let params: RequestParameters = serde_json::from_value(serde_json::json!({
            "pageNumber": 3,
            "pageSize": 15,
            "orderBy": "age desc",
            "fields": "name"
        }))
        .unwrap();
        assert_eq!(params.page_number(), 3);
        assert_eq!(params.page_size(), 15);
        assert_eq!(params.order_by(), Some("age desc"));
        assert_eq!(params.fields(), Some("name"));
    }

    #[test]
    fn test_oversized_integers_saturate() {
        let params: RequestParameters = serde_json::from_value(serde_json::json!({
            "pageNumber": u64::MAX,
            "pageSize": "99999999999999999999"
        }))
        .unwrap();
        assert_eq!(params.page_number, i64::MAX);
        assert_eq!(params.page_size(), 50);

        let params: RequestParameters = serde_json::from_value(serde_json::json!({
            "pageNumber": "-99999999999999999999",
            "pageSize": ""
        }))
        .unwrap();
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), 10);
    }

    #[test]
    fn test_non_numeric_page_size_is_rejected() {
        let result = serde_json::from_value::<RequestParameters>(serde_json::json!({
            "pageSize": "ten"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_age_range() {
        assert!(AgeRange::default().is_valid());
        assert!(!AgeRange::new(40, 40).is_valid());
        assert!(!AgeRange::new(50, 20).is_valid());

        let range = AgeRange::new(26, 32);
        assert!(range.contains(26));
        assert!(range.contains(32));
        assert!(!range.contains(33));
    }
}
