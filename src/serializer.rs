//! Round-trip serialization of compiled schemas.
//!
//! Recognized keywords are emitted in a fixed canonical order, followed by
//! preserved unknown keys in document order. `properties`,
//! `patternProperties` and `definitions` keep their insertion order, so a
//! compiled schema serializes back to a textually equivalent document
//! (modulo whitespace and keyword-key canonicalization). Resolved `$ref`s
//! unfold in place until the circular-ref threshold is reached, after
//! which the literal `$ref` string is printed.
use crate::compilation::{Dependency, Items, RefTarget, Schema, SchemaIndex, SchemaNode};
use serde_json::{Map, Value};

/// The canonical keyword emission order.
const KEYWORD_ORDER: &[&str] = &[
    "$schema",
    "$id",
    "id",
    "$ref",
    "$comment",
    "title",
    "description",
    "type",
    "enum",
    "default",
    "examples",
    "const",
    "readOnly",
    "writeOnly",
    "definitions",
    "if",
    "then",
    "else",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "contentEncoding",
    "contentMediaType",
    "properties",
    "required",
    "maxProperties",
    "minProperties",
    "dependencies",
    "patternProperties",
    "additionalProperties",
    "propertyNames",
    "items",
    "maxItems",
    "minItems",
    "uniqueItems",
    "additionalItems",
    "contains",
    "maxLength",
    "minLength",
    "format",
    "pattern",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
];

pub(crate) fn is_recognized(key: &str) -> bool {
    KEYWORD_ORDER.contains(&key)
}

pub(crate) fn to_value(schema: &Schema) -> Value {
    let mut unfold_counts = vec![0usize; schema.refs.len()];
    node_to_value(schema, SchemaIndex(0), &mut unfold_counts)
}

fn node_to_value(schema: &Schema, index: SchemaIndex, unfold_counts: &mut Vec<usize>) -> Value {
    let node = &schema.nodes[index.0];
    if let Some(boolean) = node.boolean {
        return Value::Bool(boolean);
    }
    if let Some(reference) = node.reference {
        if let Some(RefTarget::Schema(target)) = schema.refs[reference].target {
            if unfold_counts[reference] < schema.circular_ref_threshold {
                unfold_counts[reference] += 1;
                let unfolded = node_to_value(schema, target, unfold_counts);
                unfold_counts[reference] -= 1;
                return unfolded;
            }
        }
        // Threshold reached, dialect target or unresolved: print the node
        // verbatim, `$ref` string included.
        return node.raw.clone();
    }

    let raw = match node.raw.as_object() {
        Some(raw) => raw,
        None => return node.raw.clone(),
    };
    let mut out = Map::new();
    for keyword in KEYWORD_ORDER {
        if raw.contains_key(*keyword) {
            out.insert(
                (*keyword).to_string(),
                keyword_to_value(schema, node, raw, keyword, unfold_counts),
            );
        }
    }
    for (key, value) in raw {
        if !is_recognized(key) {
            out.insert(key.clone(), value.clone());
        }
    }
    Value::Object(out)
}

fn keyword_to_value(
    schema: &Schema,
    node: &SchemaNode,
    raw: &Map<String, Value>,
    keyword: &str,
    unfold_counts: &mut Vec<usize>,
) -> Value {
    match keyword {
        "not" => single(schema, node.not, raw, keyword, unfold_counts),
        "if" => single(schema, node.if_, raw, keyword, unfold_counts),
        "then" => single(schema, node.then_, raw, keyword, unfold_counts),
        "else" => single(schema, node.else_, raw, keyword, unfold_counts),
        "additionalProperties" => {
            single(schema, node.additional_properties, raw, keyword, unfold_counts)
        }
        "propertyNames" => single(schema, node.property_names, raw, keyword, unfold_counts),
        "additionalItems" => single(schema, node.additional_items, raw, keyword, unfold_counts),
        "contains" => single(schema, node.contains, raw, keyword, unfold_counts),
        "allOf" => list(schema, &node.all_of, raw, keyword, unfold_counts),
        "anyOf" => list(schema, &node.any_of, raw, keyword, unfold_counts),
        "oneOf" => list(schema, &node.one_of, raw, keyword, unfold_counts),
        "properties" => map(schema, &node.properties, raw, keyword, unfold_counts),
        "patternProperties" => map(schema, &node.pattern_properties, raw, keyword, unfold_counts),
        "definitions" => map(schema, &node.definitions, raw, keyword, unfold_counts),
        "items" => match &node.items {
            Some(Items::Single(child)) => node_to_value(schema, *child, unfold_counts),
            Some(Items::Array(children)) => Value::Array(
                children
                    .iter()
                    .map(|child| node_to_value(schema, *child, unfold_counts))
                    .collect(),
            ),
            None => raw[keyword].clone(),
        },
        "dependencies" => match &node.dependencies {
            Some(dependencies) => {
                let mut out = Map::new();
                for (name, dependency) in dependencies {
                    let value = match dependency {
                        Dependency::Keys(_) => raw[keyword]
                            .get(name)
                            .cloned()
                            .unwrap_or(Value::Null),
                        Dependency::Schema(child) => node_to_value(schema, *child, unfold_counts),
                    };
                    out.insert(name.clone(), value);
                }
                Value::Object(out)
            }
            None => raw[keyword].clone(),
        },
        _ => raw[keyword].clone(),
    }
}

fn single(
    schema: &Schema,
    child: Option<SchemaIndex>,
    raw: &Map<String, Value>,
    keyword: &str,
    unfold_counts: &mut Vec<usize>,
) -> Value {
    match child {
        Some(child) => node_to_value(schema, child, unfold_counts),
        None => raw[keyword].clone(),
    }
}

fn list(
    schema: &Schema,
    children: &Option<Vec<SchemaIndex>>,
    raw: &Map<String, Value>,
    keyword: &str,
    unfold_counts: &mut Vec<usize>,
) -> Value {
    match children {
        Some(children) => Value::Array(
            children
                .iter()
                .map(|child| node_to_value(schema, *child, unfold_counts))
                .collect(),
        ),
        None => raw[keyword].clone(),
    }
}

fn map(
    schema: &Schema,
    children: &Option<indexmap::IndexMap<String, SchemaIndex>>,
    raw: &Map<String, Value>,
    keyword: &str,
    unfold_counts: &mut Vec<usize>,
) -> Value {
    match children {
        Some(children) => {
            let mut out = Map::new();
            for (name, child) in children {
                out.insert(name.clone(), node_to_value(schema, *child, unfold_counts));
            }
            Value::Object(out)
        }
        None => raw[keyword].clone(),
    }
}

#[cfg(test)]
mod tests {
    use crate::Schema;

    fn round_trip(document: &str) -> String {
        Schema::new(document.as_bytes()).unwrap().to_json()
    }

    #[test]
    fn boolean_schema() {
        assert_eq!(round_trip("true"), "true");
        assert_eq!(round_trip("false"), "false");
    }

    #[test]
    fn simple_schema() {
        let document = r#"{"$id":"bla","const":null,"properties":{"bla":{"type":["string","null"]},"yadda":{"enum":["abc",123,1.23,null,false]}}}"#;
        assert_eq!(round_trip(document), document);
    }

    #[test]
    fn property_insertion_order_is_kept() {
        let document = r#"{"$id":"bla","const":null,"properties":{"yadda":{"type":["string","null"]},"bla":{"enum":["abc",123,1.23,null,false]}}}"#;
        assert_eq!(round_trip(document), document);
    }

    #[test]
    fn single_and_positional_items() {
        let document = r#"{"properties":{"itemField":{"type":"array","items":{"type":"string"}},"itemsField":{"type":"array","items":[{"type":"string"}]}}}"#;
        assert_eq!(round_trip(document), document);
    }

    #[test]
    fn unknown_keys_survive() {
        let document = r#"{"someField":"someName","stringField":{"type":"string"}}"#;
        assert_eq!(round_trip(document), document);
    }

    #[test]
    fn number_lexemes_survive() {
        let document = r#"{"multipleOf":0.10,"maximum":1.0}"#;
        assert_eq!(round_trip(document), document);
    }

    #[test]
    fn keywords_canonicalize_to_a_fixed_order() {
        let document = r#"{"properties":{"a":{"type":"string"}},"$id":"x","allOf":[true]}"#;
        assert_eq!(
            round_trip(document),
            r#"{"$id":"x","allOf":[true],"properties":{"a":{"type":"string"}}}"#
        );
    }

    #[test]
    fn self_ref_unfolds_to_the_threshold() {
        let document = r##"{"$schema":"http://json-schema.org/draft-04/schema#","properties":{"foo":{"$ref":"#"}},"additionalProperties":false}"##;
        let expected = r##"{"$schema":"http://json-schema.org/draft-04/schema#","properties":{"foo":{"$schema":"http://json-schema.org/draft-04/schema#","properties":{"foo":{"$schema":"http://json-schema.org/draft-04/schema#","properties":{"foo":{"$schema":"http://json-schema.org/draft-04/schema#","properties":{"foo":{"$ref":"#"}},"additionalProperties":false}},"additionalProperties":false}},"additionalProperties":false}},"additionalProperties":false}"##;
        let mut schema = Schema::new(document.as_bytes()).unwrap();
        schema.resolve_refs().unwrap();
        assert_eq!(schema.to_json(), expected);
    }

    #[test]
    fn threshold_is_configurable() {
        let document = r##"{"properties":{"foo":{"$ref":"#"}}}"##;
        let mut schema = Schema::new(document.as_bytes()).unwrap();
        schema.resolve_refs().unwrap();
        schema.set_circular_ref_threshold(1);
        assert_eq!(
            schema.to_json(),
            r##"{"properties":{"foo":{"properties":{"foo":{"$ref":"#"}}}}}"##
        );
    }

    #[test]
    fn unresolved_refs_serialize_verbatim() {
        let document = r#"{"properties":{"foo":{"$ref":"http://example.com/other"}}}"#;
        assert_eq!(round_trip(document), document);
    }

    #[test]
    fn absolute_uri_refs_unfold_through_definitions() {
        let document = r##"{"$id":"http://example.com/schema-refs-absolute-uris-defs1.json","properties":{"foo":{"$id":"http://example.com/schema-refs-absolute-uris-defs2.json","definitions":{"inner":{"properties":{"bar":{"type":"string"}}}},"allOf":[{"$ref":"#/definitions/inner"}]}},"allOf":[{"$ref":"schema-refs-absolute-uris-defs2.json"}]}"##;
        let expected = r##"{"$id":"http://example.com/schema-refs-absolute-uris-defs1.json","allOf":[{"$id":"http://example.com/schema-refs-absolute-uris-defs2.json","definitions":{"inner":{"properties":{"bar":{"type":"string"}}}},"allOf":[{"properties":{"bar":{"type":"string"}}}]}],"properties":{"foo":{"$id":"http://example.com/schema-refs-absolute-uris-defs2.json","definitions":{"inner":{"properties":{"bar":{"type":"string"}}}},"allOf":[{"properties":{"bar":{"type":"string"}}}]}}}"##;
        let mut schema = Schema::new(document.as_bytes()).unwrap();
        schema.resolve_refs().unwrap();
        assert_eq!(schema.to_json(), expected);
    }

    #[test]
    fn pretty_output_is_indented() {
        let schema = Schema::new(br#"{"type":"string"}"#).unwrap();
        assert_eq!(schema.pretty(), "{\n  \"type\": \"string\"\n}");
    }
}
