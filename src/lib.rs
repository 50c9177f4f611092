//! # ratify
//!
//! A JSON Schema validator for drafts 4, 6 and 7. Schema documents are
//! compiled into a validator tree once, so repeated validation carries no
//! per-call parsing cost; `$ref`s (local, cross-document and remote) are
//! wired by an explicit resolution pass; compiled schemas serialize back
//! to a textually equivalent document, unfolding reference cycles up to a
//! configurable depth.
//!
//! Supports:
//!   - JSON Schema drafts 4, 6 and 7 (draft 5 and the deprecated "latest"
//!     URL are treated as draft 4);
//!   - cross-document references via an explicit schema store;
//!   - loading remote documents via HTTP(S) with the `reqwest` feature.
//!
//! ## Example:
//!
//! ```rust
//! use ratify::Schema;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = Schema::new(br#"{"maxLength": 5}"#)?;
//!     let result = schema.validate(br#""foo bar""#);
//!     if let Err(error) = result {
//!         println!("validation error: {}", error);
//!     }
//!     Ok(())
//! }
//! ```
#![warn(
    clippy::doc_markdown,
    clippy::redundant_closure,
    clippy::explicit_iter_loop,
    clippy::match_same_arms,
    clippy::needless_borrow,
    clippy::print_stdout,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]
mod compilation;
mod error;
mod helpers;
mod keywords;
mod primitive_type;
mod resolver;
mod schemas;
mod serializer;
mod validator;
mod value;

pub use compilation::{Schema, SchemaOptions};
pub use error::{CompileError, ResolveError, SchemaError, ValidationError, ValidationErrorKind};
pub use primitive_type::PrimitiveType;
pub use resolver::{DenyAllLoader, RemoteLoader};
#[cfg(feature = "reqwest")]
pub use resolver::HttpLoader;
pub use schemas::Draft;
pub use value::Kind;

use serde_json::Value;

/// A shortcut for validating `instance` against `schema`. The draft is
/// detected from the schema document.
///
/// ```rust
/// use ratify::is_valid;
///
/// assert!(is_valid(br#"{"maxLength": 5}"#, br#""foo""#));
/// ```
///
/// This function panics if an invalid schema is passed.
#[must_use]
pub fn is_valid(schema: &[u8], instance: &[u8]) -> bool {
    let compiled = Schema::new(schema).expect("invalid schema");
    compiled.is_valid(instance)
}

/// Validate a schema document against the embedded meta-schema for its
/// declared draft (draft 7 when `$schema` is absent).
pub fn validate_schema_document(document: &[u8]) -> Result<(), ValidationError> {
    let value: Value =
        serde_json::from_slice(document).map_err(|error| ValidationError::parse(&error))?;
    let draft = schemas::draft_from_schema(&value).unwrap_or_default();
    schemas::dialect(draft).validate_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(is_valid(br#"{"minLength": 5}"#, br#""foobar""#));
        assert!(!is_valid(br#"{"minLength": 5}"#, br#""foo""#));
    }

    #[test]
    fn schema_documents_validate_against_their_dialect() {
        let document = br#"{"$id":"bla","const":null,"properties":{"bla":{"type":["string","null"]},"yadda":{"enum":["abc",123,1.23,null,false]}}}"#;
        assert!(validate_schema_document(document).is_ok());
        assert!(validate_schema_document(br#"{"type": "strange"}"#).is_err());
    }
}
