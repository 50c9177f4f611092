use crate::{
    compilation::SchemaNode, error::ValidationError, validator::Engine, value::Kind,
};
use serde_json::Value;

/// The `if` schema is evaluated silently; its outcome routes the instance
/// into `then` or `else`, either of which defaults to accept when absent.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
    kind: Kind,
) -> Result<(), ValidationError> {
    let condition = match node.if_ {
        Some(condition) => condition,
        None => return Ok(()),
    };
    if engine.is_valid_node(condition, instance, kind) {
        if let Some(then) = node.then_ {
            return engine.validate_node(then, instance, kind);
        }
    } else if let Some(otherwise) = node.else_ {
        return engine.validate_node(otherwise, instance, kind);
    }
    Ok(())
}
