use crate::{compilation::SchemaNode, error::ValidationError, validator::Engine};
use serde_json::Value;

/// Every property name of the object validates, as a string, against the
/// `propertyNames` schema.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
) -> Result<(), ValidationError> {
    let object = match instance {
        Value::Object(object) => object,
        _ => return Ok(()),
    };
    let schema = match node.property_names {
        Some(schema) => schema,
        None => return Ok(()),
    };
    for key in object.keys() {
        let name = Value::String(key.clone());
        engine
            .validate_instance(schema, &name)
            .map_err(|error| error.at(key))?;
    }
    Ok(())
}
