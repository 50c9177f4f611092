use crate::{
    compilation::SchemaNode, error::ValidationError, validator::Engine, value::Kind,
};
use serde_json::Value;

pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
    kind: Kind,
) -> Result<(), ValidationError> {
    if let Some(schemas) = &node.all_of {
        for schema in schemas {
            engine.validate_node(*schema, instance, kind)?;
        }
    }
    Ok(())
}
