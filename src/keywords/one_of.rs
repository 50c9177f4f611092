use crate::{
    compilation::SchemaNode, error::ValidationError, validator::Engine, value::Kind,
};
use serde_json::Value;

/// Exactly one branch must accept the instance; a second match fails fast.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
    kind: Kind,
) -> Result<(), ValidationError> {
    if let Some(schemas) = &node.one_of {
        let mut valid = false;
        for schema in schemas {
            if engine.is_valid_node(*schema, instance, kind) {
                if valid {
                    return Err(ValidationError::one_of_multiple_valid(instance));
                }
                valid = true;
            }
        }
        if !valid {
            return Err(ValidationError::one_of_not_valid(instance));
        }
    }
    Ok(())
}
