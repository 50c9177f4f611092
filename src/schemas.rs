use crate::{compilation::Schema, SchemaOptions};
use serde_json::Value;
use url::Url;

/// The schema dialect in effect for a compiled root.
///
/// Draft-specific behaviour (the draft-4 integer rule and the shape of the
/// exclusive bounds) is driven by the root's `$schema` and passed down
/// explicitly through validation.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Draft {
    Draft4,
    Draft6,
    Draft7,
}

impl Default for Draft {
    fn default() -> Self {
        Draft::Draft7
    }
}

/// Get the `Draft` from a JSON Schema URL.
pub(crate) fn draft_from_url(url: &str) -> Option<Draft> {
    match url {
        "http://json-schema.org/draft-07/schema#" => Some(Draft::Draft7),
        "http://json-schema.org/draft-06/schema#" => Some(Draft::Draft6),
        // Draft 5 was a no-change patch of draft 4, and the bare URL meant
        // "latest" back when draft 4 was the latest.
        "http://json-schema.org/draft-04/schema#"
        | "http://json-schema.org/draft-05/schema#"
        | "http://json-schema.org/schema#" => Some(Draft::Draft4),
        _ => None,
    }
}

/// Get the `Draft` from the `$schema` key of a schema document.
pub(crate) fn draft_from_schema(schema: &Value) -> Option<Draft> {
    schema
        .as_object()
        .and_then(|object| object.get("$schema"))
        .and_then(Value::as_str)
        .and_then(draft_from_url)
}

/// The identifier of a schema object: `id` under draft 4, `$id` otherwise.
pub(crate) fn id_of(draft: Draft, schema: &Value) -> Option<&str> {
    if let Value::Object(object) = schema {
        if draft == Draft::Draft4 {
            object.get("id")
        } else {
            object.get("$id")
        }
        .and_then(Value::as_str)
    } else {
        None
    }
}

lazy_static::lazy_static! {
    static ref DRAFT4: Schema = SchemaOptions::default()
        .with_draft(Draft::Draft4)
        .build(include_bytes!("../meta_schemas/draft4.json"))
        .expect("draft 4 meta-schema must compile");
    static ref DRAFT6: Schema = SchemaOptions::default()
        .with_draft(Draft::Draft6)
        .build(include_bytes!("../meta_schemas/draft6.json"))
        .expect("draft 6 meta-schema must compile");
    static ref DRAFT7: Schema = SchemaOptions::default()
        .with_draft(Draft::Draft7)
        .build(include_bytes!("../meta_schemas/draft7.json"))
        .expect("draft 7 meta-schema must compile");
}

/// The embedded dialect schema for a draft.
pub(crate) fn dialect(draft: Draft) -> &'static Schema {
    match draft {
        Draft::Draft4 => &DRAFT4,
        Draft::Draft6 => &DRAFT6,
        Draft::Draft7 => &DRAFT7,
    }
}

/// Intercept references to the well-known meta-schema locations; the
/// fragment is irrelevant for the match.
pub(crate) fn meta_schema_for_url(url: &Url) -> Option<Draft> {
    let mut url = url.clone();
    url.set_fragment(None);
    match url.as_str() {
        "http://json-schema.org/draft-07/schema" => Some(Draft::Draft7),
        "http://json-schema.org/draft-06/schema" => Some(Draft::Draft6),
        "http://json-schema.org/draft-04/schema"
        | "http://json-schema.org/draft-05/schema"
        | "http://json-schema.org/schema" => Some(Draft::Draft4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"$schema": "http://json-schema.org/draft-07/schema#"}), Some(Draft::Draft7))]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-06/schema#"}), Some(Draft::Draft6))]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-04/schema#"}), Some(Draft::Draft4))]
    #[test_case(json!({"$schema": "http://json-schema.org/draft-05/schema#"}), Some(Draft::Draft4); "draft 5 is draft 4")]
    #[test_case(json!({"$schema": "http://json-schema.org/schema#"}), Some(Draft::Draft4); "latest is draft 4")]
    #[test_case(json!({"$schema": "http://example.com/custom/schema#"}), None)]
    fn test_draft_from_schema(schema: Value, draft: Option<Draft>) {
        assert_eq!(draft_from_schema(&schema), draft)
    }

    #[test]
    fn id_depends_on_draft() {
        let schema = json!({"id": "a", "$id": "b"});
        assert_eq!(id_of(Draft::Draft4, &schema), Some("a"));
        assert_eq!(id_of(Draft::Draft7, &schema), Some("b"));
    }

    #[test]
    fn dialect_schemas_compile() {
        for draft in [Draft::Draft4, Draft::Draft6, Draft::Draft7] {
            let schema = dialect(draft);
            assert_eq!(schema.draft(), draft);
        }
    }

    #[test]
    fn dialect_schemas_accept_themselves() {
        assert!(dialect(Draft::Draft7)
            .validate(include_bytes!("../meta_schemas/draft7.json"))
            .is_ok());
        assert!(dialect(Draft::Draft4)
            .validate(include_bytes!("../meta_schemas/draft4.json"))
            .is_ok());
    }

    #[test]
    fn meta_schema_urls_match_without_fragment() {
        let url = Url::parse("http://json-schema.org/draft-07/schema#").unwrap();
        assert_eq!(meta_schema_for_url(&url), Some(Draft::Draft7));
        let url = Url::parse("http://example.com/schema").unwrap();
        assert_eq!(meta_schema_for_url(&url), None);
    }
}
