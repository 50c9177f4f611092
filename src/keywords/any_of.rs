use crate::{
    compilation::SchemaNode, error::ValidationError, validator::Engine, value::Kind,
};
use serde_json::Value;

/// Branch failures stay silent unless every branch fails.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
    kind: Kind,
) -> Result<(), ValidationError> {
    if let Some(schemas) = &node.any_of {
        if schemas
            .iter()
            .any(|schema| engine.is_valid_node(*schema, instance, kind))
        {
            return Ok(());
        }
        return Err(ValidationError::any_of(instance));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn one_passing_branch_is_enough() {
        let schema = json!({"anyOf": [{"type": "string"}, {"minimum": 5}]});
        let schema = Schema::new(schema.to_string().as_bytes()).unwrap();
        assert!(schema.validate(br#""x""#).is_ok());
        assert!(schema.validate(b"7").is_ok());
        assert!(schema.validate(b"2").is_err());
    }
}
