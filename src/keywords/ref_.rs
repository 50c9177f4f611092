use crate::{
    compilation::{RefTarget, SchemaNode},
    error::ValidationError,
    schemas,
    validator::Engine,
    value::Kind,
};
use serde_json::Value;

/// Validate through the cached reference target. When `$ref` is present it
/// is the only keyword that runs at the node, so everything the schema
/// says about the instance comes from the target.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
    kind: Kind,
) -> Result<(), ValidationError> {
    let reference = match node.reference {
        Some(reference) => &engine.schema.refs[reference],
        None => return Ok(()),
    };
    match reference.target {
        Some(RefTarget::Schema(target)) => engine.validate_node(target, instance, kind),
        Some(RefTarget::Dialect(draft)) => schemas::dialect(draft).validate_value(instance),
        None => Err(ValidationError::unresolved_reference(&reference.reference)),
    }
}
