use ratify::{Draft, Schema};
use serde_json::{json, Value};

fn compile(schema: Value) -> Schema {
    Schema::new(schema.to_string().as_bytes()).unwrap()
}

fn compile_draft(schema: Value, draft: Draft) -> Schema {
    Schema::options()
        .with_draft(draft)
        .build(schema.to_string().as_bytes())
        .unwrap()
}

#[test]
fn integer_type_coercion_depends_on_the_draft() {
    // Draft 7 accepts 1.0 as an integer; draft 4 calls it a number.
    let schema = json!({"type": "integer"});
    assert!(compile_draft(schema.clone(), Draft::Draft7)
        .validate(b"1.0")
        .is_ok());
    let error = compile_draft(schema, Draft::Draft4)
        .validate(b"1.0")
        .unwrap_err();
    assert!(format!("{}", error).contains("number"));
}

#[test]
fn unique_items_ignore_object_key_order() {
    let schema = compile(json!({"type": "array", "uniqueItems": true}));
    assert!(schema
        .validate(br#"[{"a":1,"b":2},{"b":2,"a":1}]"#)
        .is_err());
    assert!(schema
        .validate(br#"[{"a":1,"b":2},{"a":1,"b":3}]"#)
        .is_ok());
}

#[test]
fn multiple_of_uses_exact_rationals() {
    let schema = compile(json!({"multipleOf": 0.1}));
    // 1.2 / 0.1 is not an integer in binary floating point.
    assert!(schema.validate(b"1.2").is_ok());
    assert!(schema.validate(b"1.25").is_err());
}

#[test]
fn if_then_else_routing() {
    let schema = compile(json!({
        "if": {"properties": {"kind": {"const": "a"}}},
        "then": {"required": ["x"]},
        "else": {"required": ["y"]}
    }));
    assert!(schema.validate(br#"{"kind": "a"}"#).is_err());
    assert!(schema.validate(br#"{"kind": "b", "y": 1}"#).is_ok());
}

#[test]
fn boolean_schemas_and_the_empty_document() {
    let always = Schema::new(b"true").unwrap();
    for document in [&b"1"[..], br#""s""#, b"null", b"[]", b"{}"] {
        assert!(always.validate(document).is_ok());
    }
    assert!(always.validate(b"").is_err());

    let never = Schema::new(b"false").unwrap();
    for document in [&b"1"[..], br#""s""#, b"null", b"[]", b"{}"] {
        assert!(never.validate(document).is_err());
    }
    assert!(never.validate(b"").is_ok());
}

#[test]
fn validation_is_pure_after_compilation() {
    let schema = compile(json!({
        "properties": {"a": {"$ref": "#/definitions/n"}},
        "definitions": {"n": {"type": "number", "maximum": 10}}
    }));
    for _ in 0..5 {
        assert!(schema.validate(br#"{"a": 3}"#).is_ok());
        assert!(schema.validate(br#"{"a": 30}"#).is_err());
    }
}

#[test]
fn nested_composition() {
    let schema = compile(json!({
        "allOf": [
            {"type": "object"},
            {"anyOf": [
                {"required": ["a"]},
                {"required": ["b"]}
            ]},
            {"not": {"required": ["forbidden"]}}
        ]
    }));
    assert!(schema.validate(br#"{"a": 1}"#).is_ok());
    assert!(schema.validate(br#"{"b": 1}"#).is_ok());
    assert!(schema.validate(br#"{"c": 1}"#).is_err());
    assert!(schema.validate(br#"{"a": 1, "forbidden": true}"#).is_err());
}

#[test]
fn string_keywords_work_together() {
    let schema = compile(json!({
        "type": "string",
        "minLength": 3,
        "maxLength": 10,
        "pattern": "^[a-z-]+$",
        "format": "hostname"
    }));
    assert!(schema.validate(br#""abc-def""#).is_ok());
    assert!(schema.validate(br#""ab""#).is_err());
    assert!(schema.validate(br#""ABC""#).is_err());
    assert!(schema.validate(br#""-abc""#).is_err());
}

#[test]
fn numeric_keywords_work_together() {
    let schema = compile(json!({
        "type": "number",
        "minimum": 0,
        "exclusiveMaximum": 100,
        "multipleOf": 5
    }));
    assert!(schema.validate(b"0").is_ok());
    assert!(schema.validate(b"95").is_ok());
    assert!(schema.validate(b"100").is_err());
    assert!(schema.validate(b"7").is_err());
    assert!(schema.validate(b"-5").is_err());
}

#[test]
fn object_shape_end_to_end() {
    let schema = compile(json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "age": {"type": "integer", "minimum": 0},
            "tags": {
                "type": "array",
                "items": {"type": "string"},
                "uniqueItems": true
            }
        },
        "required": ["name"],
        "additionalProperties": false
    }));
    let valid = json!({"name": "joe", "age": 41, "tags": ["a", "b"]});
    assert!(schema.validate(valid.to_string().as_bytes()).is_ok());

    let error = schema
        .validate(br#"{"name": "joe", "tags": ["a", "a"]}"#)
        .unwrap_err();
    assert_eq!(error.instance_path(), "@.tags");

    let error = schema.validate(br#"{"age": 41}"#).unwrap_err();
    assert_eq!(format!("{}", error), "missing required property 'name'");
}

#[test]
fn draft_is_detected_from_the_schema_key() {
    let schema = compile(json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "type": "integer"
    }));
    assert_eq!(schema.draft(), Draft::Draft4);
    assert!(schema.validate(b"1.0").is_err());

    let schema = compile(json!({
        "$schema": "http://json-schema.org/draft-05/schema#",
        "maximum": 3,
        "exclusiveMaximum": true
    }));
    assert_eq!(schema.draft(), Draft::Draft4);
    assert!(schema.validate(b"3").is_err());
    assert!(schema.validate(b"2").is_ok());
}

#[test]
fn first_failure_wins_and_carries_the_path() {
    let schema = compile(json!({
        "properties": {
            "outer": {
                "items": [
                    {"type": "string"},
                    {"properties": {"inner": {"const": 1}}}
                ]
            }
        }
    }));
    let error = schema
        .validate(br#"{"outer": ["ok", {"inner": 2}]}"#)
        .unwrap_err();
    assert_eq!(error.instance_path(), "@.outer.1.inner");
}
