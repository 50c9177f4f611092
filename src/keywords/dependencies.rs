use crate::{
    compilation::{Dependency, SchemaNode},
    error::ValidationError,
    validator::Engine,
    value::Kind,
};
use serde_json::Value;

/// For each instance property named by a dependency: a name list behaves
/// like `required`, a schema validates the whole object.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
) -> Result<(), ValidationError> {
    let object = match instance {
        Value::Object(object) => object,
        _ => return Ok(()),
    };
    if let Some(dependencies) = &node.dependencies {
        for (name, dependency) in dependencies {
            if !object.contains_key(name) {
                continue;
            }
            match dependency {
                Dependency::Keys(names) => {
                    for required in names {
                        if !object.contains_key(required) {
                            return Err(ValidationError::required(instance, required));
                        }
                    }
                }
                Dependency::Schema(schema) => {
                    engine.validate_node(*schema, instance, Kind::Object)?
                }
            }
        }
    }
    Ok(())
}
