use crate::{
    compilation::{Bound, SchemaNode},
    error::ValidationError,
    value,
};
use serde_json::Value;

/// Upper bounds, covering both draft shapes: under draft 4
/// `exclusiveMaximum` is a boolean that sharpens `maximum`; under drafts
/// 6/7 it is a numeric bound of its own. When both numeric bounds are
/// present, satisfying either one is sufficient. Comparisons are done on
/// arbitrary-precision decimals.
pub(crate) fn validate(node: &SchemaNode, instance: &Value) -> Result<(), ValidationError> {
    let number = match instance {
        Value::Number(number) => number,
        _ => return Ok(()),
    };
    let decimal = match value::decimal(number) {
        Some(decimal) => decimal,
        None => return Ok(()),
    };
    if let Some(Bound::Limit { value, lexeme }) = &node.maximum {
        let exclusive = matches!(node.exclusive_maximum, Some(Bound::Flag(true)));
        if exclusive {
            if decimal < *value {
                return Ok(());
            }
        } else if decimal <= *value {
            return Ok(());
        }
        if let Some(Bound::Limit { value, .. }) = &node.exclusive_maximum {
            if decimal < *value {
                return Ok(());
            }
        }
        return Err(if exclusive {
            ValidationError::exclusive_maximum(instance, lexeme)
        } else {
            ValidationError::maximum(instance, lexeme)
        });
    }
    if let Some(Bound::Limit { value, lexeme }) = &node.exclusive_maximum {
        if decimal >= *value {
            return Err(ValidationError::exclusive_maximum(instance, lexeme));
        }
    }
    Ok(())
}
