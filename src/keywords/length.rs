use crate::{compilation::SchemaNode, error::ValidationError};
use serde_json::Value;

// Lengths count unicode scalar values, not bytes.

pub(crate) fn validate_max(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    if let (Value::String(string), Some(limit)) = (instance, node.max_length) {
        if string.chars().count() as u64 > limit {
            return Err(ValidationError::max_length(instance, limit));
        }
    }
    Ok(())
}

pub(crate) fn validate_min(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    if let (Value::String(string), Some(limit)) = (instance, node.min_length) {
        if (string.chars().count() as u64) < limit {
            return Err(ValidationError::min_length(instance, limit));
        }
    }
    Ok(())
}
