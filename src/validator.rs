//! The validation engine: fail-fast keyword dispatch over compiled nodes.
use crate::{
    compilation::{Schema, SchemaIndex},
    error::ValidationError,
    keywords,
    schemas::Draft,
    value,
    value::Kind,
};
use serde_json::Value;

/// Read-only view the keyword validators run against. The draft travels
/// here explicitly instead of through any global state.
pub(crate) struct Engine<'a> {
    pub(crate) schema: &'a Schema,
}

impl<'a> Engine<'a> {
    pub(crate) fn draft(&self) -> Draft {
        self.schema.draft
    }

    /// Run the node's validator list in its fixed order; the first failing
    /// keyword aborts evaluation of this node.
    pub(crate) fn validate_node(
        &self,
        index: SchemaIndex,
        instance: &Value,
        kind: Kind,
    ) -> Result<(), ValidationError> {
        let node = &self.schema.nodes[index.0];
        for keyword in &node.validators {
            keywords::run(*keyword, self, node, instance, kind)?;
        }
        Ok(())
    }

    pub(crate) fn validate_instance(
        &self,
        index: SchemaIndex,
        instance: &Value,
    ) -> Result<(), ValidationError> {
        self.validate_node(index, instance, value::kind_of(instance))
    }

    pub(crate) fn is_valid_node(&self, index: SchemaIndex, instance: &Value, kind: Kind) -> bool {
        self.validate_node(index, instance, kind).is_ok()
    }

    pub(crate) fn is_valid_instance(&self, index: SchemaIndex, instance: &Value) -> bool {
        self.validate_instance(index, instance).is_ok()
    }
}

impl Schema {
    /// Validate an instance document. Returns the first violation, with
    /// its dot-separated path from the document root.
    ///
    /// An empty document is a special case: it is valid against a `false`
    /// schema and nothing else.
    pub fn validate(&self, document: &[u8]) -> Result<(), ValidationError> {
        if document.is_empty() {
            return if self.nodes[0].boolean == Some(false) {
                Ok(())
            } else {
                Err(ValidationError::empty_document())
            };
        }
        let instance: Value =
            serde_json::from_slice(document).map_err(|error| ValidationError::parse(&error))?;
        self.validate_value(&instance)
    }

    /// Validate an already-parsed instance.
    pub fn validate_value(&self, instance: &Value) -> Result<(), ValidationError> {
        let engine = Engine { schema: self };
        engine.validate_node(SchemaIndex(0), instance, value::kind_of(instance))
    }

    /// Boolean shortcut for `validate`.
    pub fn is_valid(&self, document: &[u8]) -> bool {
        self.validate(document).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::Schema;

    #[test]
    fn empty_document_only_matches_false() {
        // An empty byte stream is not JSON; only the "reject everything"
        // schema is satisfied by it.
        let false_schema = Schema::new(b"false").unwrap();
        assert!(false_schema.validate(b"").is_ok());

        let true_schema = Schema::new(b"true").unwrap();
        let err = true_schema.validate(b"").unwrap_err();
        assert_eq!(
            format!("{}", err),
            r#"empty document is not valid against any other schemas than "false""#
        );

        let empty_schema = Schema::new(b"{}").unwrap();
        assert!(empty_schema.validate(b"").is_err());
    }

    #[test]
    fn true_schema_accepts_any_document() {
        let schema = Schema::new(b"true").unwrap();
        for document in [&b"1"[..], br#""s""#, b"null", b"[1,2]", br#"{"a":1}"#] {
            assert!(schema.validate(document).is_ok());
        }
    }

    #[test]
    fn false_schema_rejects_every_document() {
        let schema = Schema::new(b"false").unwrap();
        for document in [&b"1"[..], br#""s""#, b"null", b"[]", b"{}"] {
            assert!(schema.validate(document).is_err());
        }
    }

    #[test]
    fn garbage_documents_are_parse_errors() {
        let schema = Schema::new(b"{}").unwrap();
        assert!(schema.validate(b"{not json").is_err());
    }

    #[test]
    fn validation_is_deterministic() {
        let schema = Schema::new(
            br#"{"properties":{"a":{"type":"integer"},"b":{"type":"string"}}}"#,
        )
        .unwrap();
        let document = br#"{"a":"x","b":1}"#;
        let first = format!("{}", schema.validate(document).unwrap_err());
        for _ in 0..3 {
            assert_eq!(format!("{}", schema.validate(document).unwrap_err()), first);
        }
        // Property evaluation follows document order, so `a` fails first.
        assert!(first.ends_with("at @.a"));
    }
}
