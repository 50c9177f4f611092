use crate::{compilation::SchemaNode, error::ValidationError};
use serde_json::Value;

/// Probe the object for every required name; the first missing one fails.
pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    let object = match instance {
        Value::Object(object) => object,
        _ => return Ok(()),
    };
    if let Some(required) = &node.required {
        for name in required {
            if !object.contains_key(name) {
                return Err(ValidationError::required(instance, name));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn missing_property_is_reported_by_name() {
        let schema = json!({"required": ["x", "y"]});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(br#"{"x": 1, "y": 2}"#).is_ok());
        let error = schema.validate(br#"{"x": 1}"#).unwrap_err();
        assert_eq!(format!("{}", error), "missing required property 'y'");
    }

    #[test]
    fn non_objects_are_ignored() {
        let schema = json!({"required": ["x"]});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(b"[1, 2]").is_ok());
    }
}
