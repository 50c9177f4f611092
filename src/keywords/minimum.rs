use crate::{
    compilation::{Bound, SchemaNode},
    error::ValidationError,
    value,
};
use serde_json::Value;

/// Lower bounds; the mirror of `maximum` with both draft shapes. When
/// both numeric bounds are present, satisfying either one is sufficient.
pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    let number = match instance {
        Value::Number(number) => number,
        _ => return Ok(()),
    };
    let decimal = match value::decimal(number) {
        Some(decimal) => decimal,
        None => return Ok(()),
    };
    if let Some(Bound::Limit { value, lexeme }) = &node.minimum {
        let exclusive = matches!(node.exclusive_minimum, Some(Bound::Flag(true)));
        if exclusive {
            if decimal > *value {
                return Ok(());
            }
        } else if decimal >= *value {
            return Ok(());
        }
        if let Some(Bound::Limit { value, .. }) = &node.exclusive_minimum {
            if decimal > *value {
                return Ok(());
            }
        }
        return Err(if exclusive {
            ValidationError::exclusive_minimum(instance, lexeme)
        } else {
            ValidationError::minimum(instance, lexeme)
        });
    }
    if let Some(Bound::Limit { value, lexeme }) = &node.exclusive_minimum {
        if decimal <= *value {
            return Err(ValidationError::exclusive_minimum(instance, lexeme));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Draft, Schema};
    use serde_json::{json, Value};

    fn compile(schema: Value, draft: Draft) -> Schema {
        Schema::options()
            .with_draft(draft)
            .build(schema.to_string().as_bytes())
            .unwrap()
    }

    #[test]
    fn inclusive_minimum() {
        let schema = compile(json!({"minimum": 3}), Draft::Draft7);
        assert!(schema.validate(b"3").is_ok());
        assert!(schema.validate(b"2.5").is_err());
    }

    #[test]
    fn draft4_boolean_exclusive_flag() {
        let schema = compile(
            json!({"minimum": 3, "exclusiveMinimum": true}),
            Draft::Draft4,
        );
        assert!(schema.validate(b"3.1").is_ok());
        assert!(schema.validate(b"3").is_err());
    }

    #[test]
    fn draft7_numeric_exclusive_bound() {
        let schema = compile(json!({"exclusiveMinimum": 3}), Draft::Draft7);
        assert!(schema.validate(b"3.1").is_ok());
        assert!(schema.validate(b"3").is_err());
    }

    #[test]
    fn either_numeric_bound_may_accept() {
        let schema = compile(
            json!({"minimum": 5, "exclusiveMinimum": 3}),
            Draft::Draft7,
        );
        // 4 is under `minimum` but over the exclusive bound, which is enough.
        assert!(schema.validate(b"5").is_ok());
        assert!(schema.validate(b"4").is_ok());
        assert!(schema.validate(b"3").is_err());
    }
}
