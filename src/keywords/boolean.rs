use crate::{compilation::SchemaNode, error::ValidationError, value::Kind};
use serde_json::Value;

/// The always-first validator: any parsed value is acceptable, only a
/// value of unknown kind is rejected outright.
pub(crate) fn validate_value(instance: &Value, kind: Kind) -> Result<(), ValidationError> {
    if kind == Kind::Unknown {
        return Err(ValidationError::false_schema(instance));
    }
    Ok(())
}

/// `true` admits everything that reached this point; `false` admits nothing.
pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    if node.boolean == Some(false) {
        return Err(ValidationError::false_schema(instance));
    }
    Ok(())
}
