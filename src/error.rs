use crate::{primitive_type::PrimitiveType, value::Kind};
use serde_json::Value;
use std::{
    error, fmt,
    fmt::{Error, Formatter},
};

/// A single defect found while compiling a schema document.
#[derive(Debug)]
pub enum SchemaError {
    /// The document is not valid JSON.
    JsonParse { error: serde_json::Error },
    /// The document (or a sub-schema slot) is neither an object nor a boolean.
    DocumentType { found: String },
    /// An `$id` / `id` could not be resolved against the enclosing base URI.
    InvalidIdentifier { id: String, error: url::ParseError },
    /// `$ref` holds something other than a string.
    InvalidReference,
    /// The `type` keyword names a type outside the draft vocabulary.
    UnknownType { value: String },
    /// A `pattern` / `patternProperties` regex failed to compile after dialect translation.
    InvalidRegex { pattern: String, error: String },
    /// A keyword value has the wrong JSON shape.
    KeywordShape {
        keyword: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            SchemaError::JsonParse { error } => write!(f, "{}", error),
            SchemaError::DocumentType { found } => {
                write!(f, "expected schema to be an object or boolean, got {}", found)
            }
            SchemaError::InvalidIdentifier { id, error } => {
                write!(f, "invalid identifier '{}': {}", id, error)
            }
            SchemaError::InvalidReference => write!(f, "expected $ref to be a string"),
            SchemaError::UnknownType { value } => write!(f, "unknown type '{}'", value),
            SchemaError::InvalidRegex { pattern, error } => {
                write!(f, "invalid regex '{}': {}", pattern, error)
            }
            SchemaError::KeywordShape { keyword, expected } => {
                write!(f, "expected '{}' to be {}", keyword, expected)
            }
        }
    }
}

/// All defects found while compiling one schema document.
///
/// Compilation keeps going after the first defect, so one bad keyword does
/// not hide the others.
#[derive(Debug)]
pub struct CompileError {
    errors: Vec<SchemaError>,
}

impl CompileError {
    pub(crate) fn new(errors: Vec<SchemaError>) -> CompileError {
        CompileError { errors }
    }

    /// Every defect, in document order.
    pub fn errors(&self) -> &[SchemaError] {
        &self.errors
    }
}

impl error::Error for CompileError {}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for (index, error) in self.errors.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl From<serde_json::Error> for CompileError {
    fn from(error: serde_json::Error) -> Self {
        CompileError::new(vec![SchemaError::JsonParse { error }])
    }
}

/// An error raised while resolving `$ref`s.
#[derive(Debug)]
pub enum ResolveError {
    /// The `$ref` string is empty or malformed.
    InvalidReference { reference: String },
    /// Nothing is registered under the reference.
    UnresolvedReference { reference: String },
    /// A JSON-pointer walk left the document.
    PointerWalk { reference: String },
    /// The remote loader refused or failed to fetch a document.
    Fetch { url: String, message: String },
    /// A remote document is not valid JSON.
    JsonParse { error: serde_json::Error },
    /// A remote document (or a pointer target) failed to compile.
    Compile(CompileError),
}

impl error::Error for ResolveError {}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ResolveError::InvalidReference { reference } => {
                write!(f, "$ref '{}' is invalid", reference)
            }
            ResolveError::UnresolvedReference { reference } => {
                write!(f, "unable to find ref: {}", reference)
            }
            ResolveError::PointerWalk { reference } => {
                write!(f, "unable to find schema at path: {}", reference)
            }
            ResolveError::Fetch { url, message } => {
                write!(f, "unable to fetch '{}': {}", url, message)
            }
            ResolveError::JsonParse { error } => write!(f, "{}", error),
            ResolveError::Compile(error) => write!(f, "{}", error),
        }
    }
}

impl From<serde_json::Error> for ResolveError {
    fn from(error: serde_json::Error) -> Self {
        ResolveError::JsonParse { error }
    }
}

impl From<CompileError> for ResolveError {
    fn from(error: CompileError) -> Self {
        ResolveError::Compile(error)
    }
}

/// The first violation found while validating an instance document.
#[derive(Debug)]
pub struct ValidationError {
    instance: Value,
    kind: ValidationErrorKind,
    /// Path segments from the failing value up to the document root.
    path: Vec<String>,
}

/// Kinds of violations a validator may report.
#[derive(Debug)]
pub enum ValidationErrorKind {
    /// The instance document is empty; only a `false` schema accepts that.
    EmptyDocument,
    /// The instance document is not valid JSON.
    Parse { message: String },
    /// Everything is invalid for a `false` schema.
    FalseSchema,
    /// A `$ref` had no resolved target at validation time.
    UnresolvedReference { reference: String },
    /// The value does not have one of the required types.
    Type {
        actual: Kind,
        expected: Vec<PrimitiveType>,
    },
    /// The string does not match the schema pattern.
    Pattern { pattern: String },
    /// A required property is missing.
    Required { property: String },
    /// The value is not a multiple of the given number.
    MultipleOf { multiple_of: String },
    /// The number is above the maximum.
    Maximum { limit: String },
    /// The number is not strictly below the exclusive maximum.
    ExclusiveMaximum { limit: String },
    /// The number is below the minimum.
    Minimum { limit: String },
    /// The number is not strictly above the exclusive minimum.
    ExclusiveMinimum { limit: String },
    /// The string is too long.
    MaxLength { limit: u64 },
    /// The string is too short.
    MinLength { limit: u64 },
    /// The array has too many items.
    MaxItems { limit: u64 },
    /// The array has too few items.
    MinItems { limit: u64 },
    /// The object has too many properties.
    MaxProperties { limit: u64 },
    /// The object has too few properties.
    MinProperties { limit: u64 },
    /// The array contains duplicate elements.
    UniqueItems,
    /// No array element matched the `contains` schema.
    Contains,
    /// The value is not one of the `enum` options.
    Enum { options: Value },
    /// The value does not equal the `const` value.
    Constant { expected: Value },
    /// No `anyOf` branch accepted the value.
    AnyOf,
    /// No `oneOf` branch accepted the value.
    OneOfNotValid,
    /// More than one `oneOf` branch accepted the value.
    OneOfMultipleValid,
    /// The `not` schema accepted the value.
    Not,
    /// The string does not satisfy the named format.
    Format { format: String },
}

/// Shortcuts for creation of specific error kinds.
impl ValidationError {
    fn new(instance: &Value, kind: ValidationErrorKind) -> ValidationError {
        ValidationError {
            instance: instance.clone(),
            kind,
            path: Vec::new(),
        }
    }

    /// Record that the error was found under the given property name or
    /// array index. Segments accumulate leaf-first as the error propagates
    /// towards the root.
    pub(crate) fn at(mut self, segment: &str) -> ValidationError {
        self.path.push(segment.to_string());
        self
    }

    /// The dot-separated instance path, rooted at `@`.
    pub fn instance_path(&self) -> String {
        let mut path = String::from("@");
        for segment in self.path.iter().rev() {
            path.push('.');
            path.push_str(segment);
        }
        path
    }

    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    pub(crate) fn empty_document() -> ValidationError {
        ValidationError::new(&Value::Null, ValidationErrorKind::EmptyDocument)
    }
    pub(crate) fn parse(error: &serde_json::Error) -> ValidationError {
        ValidationError::new(
            &Value::Null,
            ValidationErrorKind::Parse {
                message: error.to_string(),
            },
        )
    }
    pub(crate) fn false_schema(instance: &Value) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::FalseSchema)
    }
    pub(crate) fn unresolved_reference(reference: &str) -> ValidationError {
        ValidationError::new(
            &Value::Null,
            ValidationErrorKind::UnresolvedReference {
                reference: reference.to_string(),
            },
        )
    }
    pub(crate) fn type_error(
        instance: &Value,
        actual: Kind,
        expected: Vec<PrimitiveType>,
    ) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::Type { actual, expected })
    }
    pub(crate) fn pattern(instance: &Value, pattern: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::Pattern {
                pattern: pattern.to_string(),
            },
        )
    }
    pub(crate) fn required(instance: &Value, property: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::Required {
                property: property.to_string(),
            },
        )
    }
    pub(crate) fn multiple_of(instance: &Value, multiple_of: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::MultipleOf {
                multiple_of: multiple_of.to_string(),
            },
        )
    }
    pub(crate) fn maximum(instance: &Value, limit: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::Maximum {
                limit: limit.to_string(),
            },
        )
    }
    pub(crate) fn exclusive_maximum(instance: &Value, limit: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::ExclusiveMaximum {
                limit: limit.to_string(),
            },
        )
    }
    pub(crate) fn minimum(instance: &Value, limit: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::Minimum {
                limit: limit.to_string(),
            },
        )
    }
    pub(crate) fn exclusive_minimum(instance: &Value, limit: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::ExclusiveMinimum {
                limit: limit.to_string(),
            },
        )
    }
    pub(crate) fn max_length(instance: &Value, limit: u64) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::MaxLength { limit })
    }
    pub(crate) fn min_length(instance: &Value, limit: u64) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::MinLength { limit })
    }
    pub(crate) fn max_items(instance: &Value, limit: u64) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::MaxItems { limit })
    }
    pub(crate) fn min_items(instance: &Value, limit: u64) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::MinItems { limit })
    }
    pub(crate) fn max_properties(instance: &Value, limit: u64) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::MaxProperties { limit })
    }
    pub(crate) fn min_properties(instance: &Value, limit: u64) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::MinProperties { limit })
    }
    pub(crate) fn unique_items(instance: &Value) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::UniqueItems)
    }
    pub(crate) fn contains(instance: &Value) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::Contains)
    }
    pub(crate) fn enumeration(instance: &Value, options: &[Value]) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::Enum {
                options: Value::Array(options.to_vec()),
            },
        )
    }
    pub(crate) fn constant(instance: &Value, expected: &Value) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::Constant {
                expected: expected.clone(),
            },
        )
    }
    pub(crate) fn any_of(instance: &Value) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::AnyOf)
    }
    pub(crate) fn one_of_not_valid(instance: &Value) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::OneOfNotValid)
    }
    pub(crate) fn one_of_multiple_valid(instance: &Value) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::OneOfMultipleValid)
    }
    pub(crate) fn not(instance: &Value) -> ValidationError {
        ValidationError::new(instance, ValidationErrorKind::Not)
    }
    pub(crate) fn format(instance: &Value, format: &str) -> ValidationError {
        ValidationError::new(
            instance,
            ValidationErrorKind::Format {
                format: format.to_string(),
            },
        )
    }
}

impl error::Error for ValidationError {}

/// Textual representation of validation errors; the instance path is
/// appended whenever the failure happened below the document root.
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::EmptyDocument => write!(
                f,
                r#"empty document is not valid against any other schemas than "false""#
            )?,
            ValidationErrorKind::Parse { message } => write!(f, "{}", message)?,
            ValidationErrorKind::FalseSchema => {
                write!(f, r#"the "false" schema permits nothing, got {}"#, self.instance)?
            }
            ValidationErrorKind::UnresolvedReference { reference } => {
                write!(f, "unresolved reference: {}", reference)?
            }
            ValidationErrorKind::Type { actual, expected } => {
                if let [single] = expected.as_slice() {
                    write!(
                        f,
                        "value {} is of type {}, but should be of type: {}",
                        self.instance, actual, single
                    )?
                } else {
                    write!(
                        f,
                        "value {} is of type {}, but should be one of: {}",
                        self.instance,
                        actual,
                        expected
                            .iter()
                            .map(|t| t.to_string())
                            .collect::<Vec<String>>()
                            .join(", ")
                    )?
                }
            }
            ValidationErrorKind::Pattern { pattern } => {
                write!(f, "{} fails to match the pattern '{}'", self.instance, pattern)?
            }
            ValidationErrorKind::Required { property } => {
                write!(f, "missing required property '{}'", property)?
            }
            ValidationErrorKind::MultipleOf { multiple_of } => {
                write!(f, "{} does not divide evenly by {}", self.instance, multiple_of)?
            }
            ValidationErrorKind::Maximum { limit } => {
                write!(f, "{} exceeds the maximum {}", self.instance, limit)?
            }
            ValidationErrorKind::ExclusiveMaximum { limit } => {
                write!(f, "{} must be strictly below {}", self.instance, limit)?
            }
            ValidationErrorKind::Minimum { limit } => {
                write!(f, "{} falls below the minimum {}", self.instance, limit)?
            }
            ValidationErrorKind::ExclusiveMinimum { limit } => {
                write!(f, "{} must be strictly above {}", self.instance, limit)?
            }
            ValidationErrorKind::MaxLength { limit } => write!(
                f,
                "string {} exceeds {} characters",
                self.instance, limit
            )?,
            ValidationErrorKind::MinLength { limit } => write!(
                f,
                "string {} falls short of {} characters",
                self.instance, limit
            )?,
            ValidationErrorKind::MaxItems { limit } => write!(
                f,
                "array {} holds more than {} elements",
                self.instance, limit
            )?,
            ValidationErrorKind::MinItems { limit } => write!(
                f,
                "array {} holds fewer than {} elements",
                self.instance, limit
            )?,
            ValidationErrorKind::MaxProperties { limit } => write!(
                f,
                "object {} carries more than {} members",
                self.instance, limit
            )?,
            ValidationErrorKind::MinProperties { limit } => write!(
                f,
                "object {} carries fewer than {} members",
                self.instance, limit
            )?,
            ValidationErrorKind::UniqueItems => {
                write!(f, "duplicate elements found in {}", self.instance)?
            }
            ValidationErrorKind::Contains => write!(
                f,
                "no element of {} satisfies the contains schema",
                self.instance
            )?,
            ValidationErrorKind::Enum { options } => write!(
                f,
                "{} is not among the permitted values {}",
                self.instance, options
            )?,
            ValidationErrorKind::Constant { expected } => write!(
                f,
                "{} does not equal the expected constant {}",
                self.instance, expected
            )?,
            ValidationErrorKind::AnyOf => {
                write!(f, "{} failed every anyOf branch", self.instance)?
            }
            ValidationErrorKind::OneOfNotValid => {
                write!(f, "{} failed every oneOf branch", self.instance)?
            }
            ValidationErrorKind::OneOfMultipleValid => {
                write!(f, "{} satisfied more than one oneOf branch", self.instance)?
            }
            ValidationErrorKind::Not => write!(
                f,
                "{} should have been rejected by the not schema",
                self.instance
            )?,
            ValidationErrorKind::Format { format } => write!(
                f,
                "{} does not conform to format '{}'",
                self.instance, format
            )?,
        }
        if !self.path.is_empty() {
            write!(f, " at {}", self.instance_path())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_type_error() {
        let instance = json!("987");
        let err = ValidationError::type_error(&instance, Kind::String, vec![PrimitiveType::Number]);
        assert_eq!(
            format!("{}", err),
            r#"value "987" is of type string, but should be of type: number"#
        );
    }

    #[test]
    fn error_path_is_rooted_and_dotted() {
        let instance = json!("987");
        let err = ValidationError::type_error(&instance, Kind::String, vec![PrimitiveType::Number])
            .at("id")
            .at("subitem2")
            .at("item");
        assert_eq!(err.instance_path(), "@.item.subitem2.id");
        assert_eq!(
            format!("{}", err),
            r#"value "987" is of type string, but should be of type: number at @.item.subitem2.id"#
        );
    }

    #[test]
    fn multiple_types_error() {
        let instance = json!(42);
        let err = ValidationError::type_error(
            &instance,
            Kind::Integer,
            vec![PrimitiveType::String, PrimitiveType::Object],
        );
        assert_eq!(
            format!("{}", err),
            "value 42 is of type integer, but should be one of: string, object"
        );
    }
}
