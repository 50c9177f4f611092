use crate::{
    compilation::{SchemaNode, TypeSlot},
    error::ValidationError,
    primitive_type::PrimitiveType,
    schemas::Draft,
    validator::Engine,
    value::Kind,
};
use serde_json::Value;

/// Type checking with the draft coercion rules: a detected integer also
/// satisfies `number`, and a number with an integral value satisfies
/// `integer` — except under draft 4, where a decimal point disqualifies a
/// value from being an integer even when the fraction is zero (`1.0`).
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
    kind: Kind,
) -> Result<(), ValidationError> {
    let slot = match &node.types {
        Some(slot) => slot,
        None => return Ok(()),
    };
    let kind = demote_for_draft(engine.draft(), instance, kind);
    if kind == Kind::Unknown {
        return Err(ValidationError::type_error(instance, kind, expected(slot)));
    }
    let satisfied = match slot {
        TypeSlot::Single(primitive) => satisfies(*primitive, kind),
        TypeSlot::Multiple(primitives) => primitives
            .iter()
            .any(|primitive| satisfies(*primitive, kind)),
    };
    if satisfied {
        Ok(())
    } else {
        Err(ValidationError::type_error(instance, kind, expected(slot)))
    }
}

/// Draft 4 reads `1.0` as a number, not an integer.
fn demote_for_draft(draft: Draft, instance: &Value, kind: Kind) -> Kind {
    if draft == Draft::Draft4 && kind == Kind::Integer {
        if let Value::Number(number) = instance {
            if number.to_string().contains('.') {
                return Kind::Number;
            }
        }
    }
    kind
}

fn satisfies(primitive: PrimitiveType, kind: Kind) -> bool {
    match primitive {
        PrimitiveType::Integer => kind == Kind::Integer,
        PrimitiveType::Number => kind == Kind::Number || kind == Kind::Integer,
        PrimitiveType::String => kind == Kind::String,
        PrimitiveType::Object => kind == Kind::Object,
        PrimitiveType::Array => kind == Kind::Array,
        PrimitiveType::Boolean => kind == Kind::Boolean,
        PrimitiveType::Null => kind == Kind::Null,
    }
}

fn expected(slot: &TypeSlot) -> Vec<PrimitiveType> {
    match slot {
        TypeSlot::Single(primitive) => vec![*primitive],
        TypeSlot::Multiple(primitives) => primitives.clone(),
    }
}
