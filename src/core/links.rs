//! Hypermedia links for shaped records
//!
//! Clients that negotiate a `hateoas+json` media type get every record of a
//! collection with a `Links` array describing what can be done with it.

use crate::core::shaping::ShapedEntity;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Media type that turns on link generation
pub const HATEOAS_MEDIA_TYPE: &str = "application/vnd.roster.hateoas+json";

/// A single action available on a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.into(),
        }
    }
}

/// A shaped record followed by its links
///
/// Serializes as the record's own keys plus a trailing `Links` member.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedEntity {
    pub entity: ShapedEntity,
    pub links: Vec<Link>,
}

impl LinkedEntity {
    pub fn new(entity: ShapedEntity, links: Vec<Link>) -> Self {
        Self { entity, links }
    }
}

impl Serialize for LinkedEntity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entity.len() + 1))?;
        for (key, value) in self.entity.iter() {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("Links", &self.links)?;
        map.end()
    }
}
