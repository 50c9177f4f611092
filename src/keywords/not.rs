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
    if let Some(schema) = node.not {
        if engine.is_valid_node(schema, instance, kind) {
            return Err(ValidationError::not(instance));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn inverts_the_subschema() {
        let schema = json!({"not": {"type": "string"}});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(b"1").is_ok());
        assert!(schema.validate(br#""x""#).is_err());
    }
}
