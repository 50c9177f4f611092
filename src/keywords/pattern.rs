use crate::{compilation::SchemaNode, error::ValidationError};
use serde_json::Value;

pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    let string = match instance {
        Value::String(string) => string,
        _ => return Ok(()),
    };
    if let (Some(regex), Some(pattern)) = (&node.pattern_regexp, &node.pattern) {
        if !matches!(regex.is_match(string), Ok(true)) {
            return Err(ValidationError::pattern(instance, pattern));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn anchored_pattern() {
        let schema = json!({"pattern": "^a+$"});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(br#""aaa""#).is_ok());
        assert!(schema.validate(br#""aab""#).is_err());
        assert!(schema.validate(b"123").is_ok());
    }

    #[test]
    fn dialect_escapes_are_translated() {
        let schema = json!({"pattern": "^\\d+$"});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(br#""42""#).is_ok());
        assert!(schema.validate(br#""x""#).is_err());
    }

    #[test]
    fn invalid_pattern_is_a_compile_error() {
        let schema = json!({"pattern": "(unclosed"});
        assert!(Schema::new(schema.to_string().as_bytes()).is_err());
    }
}
