//! JSON Patch (RFC 6902) over the top-level members of a DTO
//!
//! Only single-segment paths such as `/name` are supported. Member names are
//! matched case-insensitively against the members the target serializes.

use crate::core::error::ValidationError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One patch operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

/// An ordered list of operations, applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

impl PatchDocument {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self(operations)
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    /// Apply the document to a copy of `target` and return the result
    ///
    /// The result is not validated; callers run their DTO validation on it.
    pub fn apply_to<T>(&self, target: &T) -> Result<T, ValidationError>
    where
        T: Serialize + DeserializeOwned,
    {
        let value = serde_json::to_value(target).map_err(invalid)?;
        let Value::Object(mut members) = value else {
            return Err(invalid("patch target is not an object"));
        };
        let known: Vec<String> = members.keys().cloned().collect();

        for operation in &self.0 {
            apply_operation(&mut members, &known, operation)?;
        }

        serde_json::from_value(Value::Object(members)).map_err(invalid)
    }
}

fn invalid(message: impl ToString) -> ValidationError {
    ValidationError::InvalidPatch {
        message: message.to_string(),
    }
}

/// Resolve `/member` to the canonical member name
fn member<'a>(known: &'a [String], path: &str) -> Result<&'a str, ValidationError> {
    let segment = path
        .strip_prefix('/')
        .filter(|s| !s.is_empty() && !s.contains('/'))
        .ok_or_else(|| invalid(format!("unsupported path '{path}'")))?;
    let segment = segment.replace("~1", "/").replace("~0", "~");

    known
        .iter()
        .find(|name| name.eq_ignore_ascii_case(&segment))
        .map(String::as_str)
        .ok_or_else(|| invalid(format!("the target location '{path}' was not found")))
}

fn take(members: &mut Map<String, Value>, name: &str, path: &str) -> Result<Value, ValidationError> {
    members
        .remove(name)
        .ok_or_else(|| invalid(format!("the target location '{path}' has no value")))
}

fn apply_operation(
    members: &mut Map<String, Value>,
    known: &[String],
    operation: &PatchOperation,
) -> Result<(), ValidationError> {
    match operation {
        PatchOperation::Add { path, value } => {
            let name = member(known, path)?;
            members.insert(name.to_string(), value.clone());
        }
        PatchOperation::Remove { path } => {
            let name = member(known, path)?;
            take(members, name, path)?;
        }
        PatchOperation::Replace { path, value } => {
            let name = member(known, path)?;
            take(members, name, path)?;
            members.insert(name.to_string(), value.clone());
        }
        PatchOperation::Move { from, path } => {
            let source = member(known, from)?;
            let target = member(known, path)?;
            let value = take(members, source, from)?;
            members.insert(target.to_string(), value);
        }
        PatchOperation::Copy { from, path } => {
            let source = member(known, from)?;
            let target = member(known, path)?;
            let value = members
                .get(source)
                .cloned()
                .ok_or_else(|| invalid(format!("the target location '{from}' has no value")))?;
            members.insert(target.to_string(), value);
        }
        PatchOperation::Test { path, value } => {
            let name = member(known, path)?;
            if members.get(name) != Some(value) {
                return Err(invalid(format!("the current value at '{path}' does not match")));
            }
        }
    }
    Ok(())
}
