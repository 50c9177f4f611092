use crate::{compilation::SchemaNode, error::ValidationError, value};
use serde_json::Value;

/// Same equality as `const`, applied against each option until one matches.
pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    if let Some(options) = &node.enum_ {
        if options.iter().any(|option| value::equal(option, instance)) {
            return Ok(());
        }
        return Err(ValidationError::enumeration(instance, options));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn options_cover_every_kind() {
        let schema = json!({"enum": ["abc", 123, 1.23, null, false]});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(br#""abc""#).is_ok());
        assert!(schema.validate(b"123").is_ok());
        assert!(schema.validate(b"1.23").is_ok());
        assert!(schema.validate(b"null").is_ok());
        assert!(schema.validate(b"false").is_ok());
        assert!(schema.validate(b"true").is_err());
        assert!(schema.validate(br#""ab""#).is_err());
    }

    #[test]
    fn object_options_ignore_key_order() {
        let schema = json!({"enum": [{"a": 1, "b": 2}]});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(br#"{"b": 2, "a": 1}"#).is_ok());
        assert!(schema.validate(br#"{"a": 1}"#).is_err());
    }
}
