use crate::{
    compilation::{Items, SchemaNode},
    error::ValidationError,
    schemas::Draft,
    validator::Engine,
    value,
};
use ahash::AHashSet;
use serde_json::Value;

/// The array keywords run in a single streaming pass over the elements:
/// `items` / `additionalItems` dispatch per index, `contains` probes,
/// `uniqueItems` hashes canonical encodings, and the bounds check the
/// final count.
///
/// With a positional `items` list, elements past the list validate against
/// `additionalItems`. Draft 4 additionally applies `additionalItems` when
/// `items` is absent; drafts 6/7 ignore it unless `items` is positional.
pub(crate) fn validate(
    engine: &Engine,
    node: &SchemaNode,
    instance: &Value,
) -> Result<(), ValidationError> {
    let items = match instance {
        Value::Array(items) => items,
        _ => return Ok(()),
    };

    let mut seen = if node.unique_items == Some(true) {
        Some(AHashSet::with_capacity(items.len()))
    } else {
        None
    };
    let mut contains_matched = false;

    for (index, item) in items.iter().enumerate() {
        if let Some(seen) = seen.as_mut() {
            if !seen.insert(value::unique_key(item)) {
                return Err(ValidationError::unique_items(instance));
            }
        }
        if let Some(contains) = node.contains {
            if !contains_matched && engine.is_valid_instance(contains, item) {
                contains_matched = true;
            }
        }
        match &node.items {
            Some(Items::Single(schema)) => engine
                .validate_instance(*schema, item)
                .map_err(|error| error.at(&index.to_string()))?,
            Some(Items::Array(schemas)) => {
                if let Some(schema) = schemas.get(index) {
                    engine
                        .validate_instance(*schema, item)
                        .map_err(|error| error.at(&index.to_string()))?;
                } else if let Some(additional) = node.additional_items {
                    engine
                        .validate_instance(additional, item)
                        .map_err(|error| error.at(&index.to_string()))?;
                }
            }
            None => {
                if engine.draft() == Draft::Draft4 {
                    if let Some(additional) = node.additional_items {
                        engine
                            .validate_instance(additional, item)
                            .map_err(|error| error.at(&index.to_string()))?;
                    }
                }
            }
        }
    }

    if node.contains.is_some() && !contains_matched {
        return Err(ValidationError::contains(instance));
    }
    let count = items.len() as u64;
    if let Some(limit) = node.max_items {
        if count > limit {
            return Err(ValidationError::max_items(instance, limit));
        }
    }
    if let Some(limit) = node.min_items {
        if count < limit {
            return Err(ValidationError::min_items(instance, limit));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Draft, Schema};
    use serde_json::{json, Value};

    fn compile(schema: Value) -> Schema {
        Schema::new(schema.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn single_schema_applies_to_every_element() {
        let schema = compile(json!({"items": {"type": "integer"}}));
        assert!(schema.validate(b"[1, 2, 3]").is_ok());
        let error = schema.validate(br#"[1, "x", 3]"#).unwrap_err();
        assert_eq!(error.instance_path(), "@.1");
    }

    #[test]
    fn positional_schemas_with_additional_items() {
        let schema = compile(json!({
            "items": [{"type": "integer"}, {"type": "string"}],
            "additionalItems": {"type": "boolean"}
        }));
        assert!(schema.validate(br#"[1, "a", true, false]"#).is_ok());
        assert!(schema.validate(br#"[1, "a", 3]"#).is_err());
        // Elements past the positional list without additionalItems pass.
        let open = compile(json!({"items": [{"type": "integer"}]}));
        assert!(open.validate(br#"[1, "anything"]"#).is_ok());
    }

    #[test]
    fn additional_items_without_items_only_applies_under_draft_4() {
        let schema = json!({"additionalItems": {"type": "integer"}});
        let draft7 = compile(schema.clone());
        assert!(draft7.validate(br#"["x"]"#).is_ok());
        let draft4 = Schema::options()
            .with_draft(Draft::Draft4)
            .build(schema.to_string().as_bytes())
            .unwrap();
        assert!(draft4.validate(br#"["x"]"#).is_err());
        assert!(draft4.validate(b"[1, 2]").is_ok());
    }

    #[test]
    fn contains_needs_one_match() {
        let schema = compile(json!({"contains": {"const": 5}}));
        assert!(schema.validate(b"[1, 5, 9]").is_ok());
        assert!(schema.validate(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn bounds_count_the_whole_array() {
        let schema = compile(json!({"minItems": 2, "maxItems": 3}));
        assert!(schema.validate(b"[1]").is_err());
        assert!(schema.validate(b"[1, 2]").is_ok());
        assert!(schema.validate(b"[1, 2, 3, 4]").is_err());
    }

    #[test]
    fn unique_items_sees_through_key_order() {
        let schema = compile(json!({"type": "array", "uniqueItems": true}));
        assert!(schema.validate(br#"[{"a":1,"b":2},{"a":1,"b":3}]"#).is_ok());
        // Key order must not matter for object equality.
        assert!(schema
            .validate(br#"[{"a":1,"b":2},{"b":2,"a":1}]"#)
            .is_err());
    }

    #[test]
    fn unique_items_normalizes_numbers() {
        let schema = compile(json!({"uniqueItems": true}));
        assert!(schema.validate(b"[1.0, 1]").is_err());
        assert!(schema.validate(b"[1.0, 1.5]").is_ok());
        assert!(schema.validate(b"[10, 100]").is_ok());
    }

    #[test]
    fn boolean_items_schemas() {
        let always = compile(json!({"items": true}));
        assert!(always.validate(br#"[1, "x"]"#).is_ok());
        let never = compile(json!({"items": false}));
        assert!(never.validate(b"[]").is_ok());
        assert!(never.validate(b"[1]").is_err());
    }
}
