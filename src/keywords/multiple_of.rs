use crate::{compilation::SchemaNode, error::ValidationError, value};
use serde_json::Value;

/// Exact rational division: the quotient must be an integer. Floats are
/// never consulted, so `1.2 / 0.1` divides cleanly.
pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    let number = match instance {
        Value::Number(number) => number,
        _ => return Ok(()),
    };
    if let Some((multiple_of, lexeme)) = &node.multiple_of {
        let decimal = match value::decimal(number) {
            Some(decimal) => decimal,
            None => return Err(ValidationError::multiple_of(instance, lexeme)),
        };
        let quotient = value::to_rational(&decimal) / multiple_of;
        if !quotient.is_integer() {
            return Err(ValidationError::multiple_of(instance, lexeme));
        }
    }
    Ok(())
}
