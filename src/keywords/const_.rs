use crate::{compilation::SchemaNode, error::ValidationError, value};
use serde_json::Value;

/// Structural equality: numbers compare with arbitrary precision, objects
/// and arrays compare canonically, so key order and trailing zeros never
/// matter.
pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    if let Some(expected) = &node.const_ {
        if !value::equal(expected, instance) {
            return Err(ValidationError::constant(instance, expected));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn number_consts_compare_by_value() {
        let schema = json!({"const": 1});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(b"1").is_ok());
        assert!(schema.validate(b"1.0").is_ok());
        assert!(schema.validate(b"2").is_err());
    }

    #[test]
    fn object_consts_compare_canonically() {
        let schema = json!({"const": {"x": [1, 2], "y": null}});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(br#"{"y": null, "x": [1, 2]}"#).is_ok());
        assert!(schema.validate(br#"{"x": [2, 1], "y": null}"#).is_err());
    }

    #[test]
    fn kinds_must_match() {
        let schema = json!({"const": "1"});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(b"1").is_err());
        assert!(schema.validate(br#""1""#).is_ok());
    }
}
