use crate::{compilation::SchemaNode, error::ValidationError, validator::Engine};
use serde_json::Value;

/// For each instance property, every applying schema must accept it: the
/// named `properties` entry plus each `patternProperties` regex matching
/// the name. Only when none applies does `additionalProperties` step in.
/// The property count feeds `maxProperties`/`minProperties`.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
) -> Result<(), ValidationError> {
    let object = match instance {
        Value::Object(object) => object,
        _ => return Ok(()),
    };

    for (key, property) in object {
        let mut has_schema = false;
        if let Some(properties) = &node.properties {
            if let Some(schema) = properties.get(key) {
                has_schema = true;
                engine
                    .validate_instance(*schema, property)
                    .map_err(|error| error.at(key))?;
            }
        }
        for (_, regex, schema) in &node.pattern_regexps {
            if matches!(regex.is_match(key), Ok(true)) {
                has_schema = true;
                engine
                    .validate_instance(*schema, property)
                    .map_err(|error| error.at(key))?;
            }
        }
        if !has_schema {
            if let Some(additional) = node.additional_properties {
                engine
                    .validate_instance(additional, property)
                    .map_err(|error| error.at(key))?;
            }
        }
    }

    let count = object.len() as u64;
    if let Some(limit) = node.max_properties {
        if count > limit {
            return Err(ValidationError::max_properties(instance, limit));
        }
    }
    if let Some(limit) = node.min_properties {
        if count < limit {
            return Err(ValidationError::min_properties(instance, limit));
        }
    }
    Ok(())
}
