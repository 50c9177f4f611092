//! Schema compilation.
//!
//! A schema document compiles into an arena of nodes owned by the root:
//! cross-references (including cycles) are arena indices, never pointers.
//! Compilation is a two-pass scan per node: the identity pass extracts
//! `$id`/`id`/`$ref` and wires the reference table, the keyword pass fills
//! the typed slots and recurses into sub-schemas. `$ref` targets are not
//! resolved here; every reference is appended to the root's pending list
//! for the resolver.
use crate::{
    error::{CompileError, SchemaError},
    helpers,
    keywords::Keyword,
    primitive_type::PrimitiveType,
    resolver::{DenyAllLoader, RemoteLoader},
    schemas,
    schemas::Draft,
    serializer, value,
};
use ahash::AHashMap;
use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use num_rational::BigRational;
use num_traits::Zero;
use serde_json::{Map, Value};
use std::{convert::TryFrom, fmt, str::FromStr};
use url::Url;

pub(crate) const DEFAULT_ROOT_URL: &str = "json-schema:///";

lazy_static::lazy_static! {
    pub(crate) static ref DEFAULT_SCOPE: Url =
        Url::parse(DEFAULT_ROOT_URL).expect("the default scope is a valid URL");
}

/// Index of a node in the per-root arena.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SchemaIndex(pub(crate) usize);

/// The `items` keyword accepts a single schema or a positional list.
#[derive(Debug)]
pub(crate) enum Items {
    Single(SchemaIndex),
    Array(Vec<SchemaIndex>),
}

/// A `dependencies` entry is either a list of required names or a schema.
#[derive(Debug)]
pub(crate) enum Dependency {
    Keys(Vec<String>),
    Schema(SchemaIndex),
}

/// `maximum`/`minimum` bounds and their exclusive companions. Draft 4
/// writes the exclusive keywords as booleans that modify the plain bound;
/// drafts 6/7 write them as numeric bounds of their own.
#[derive(Debug)]
pub(crate) enum Bound {
    Limit { value: BigDecimal, lexeme: String },
    Flag(bool),
}

#[derive(Debug)]
pub(crate) enum TypeSlot {
    Single(PrimitiveType),
    Multiple(Vec<PrimitiveType>),
}

/// A pending `$ref`, appended during compilation and wired by the resolver.
#[derive(Debug)]
pub(crate) struct Ref {
    pub(crate) reference: String,
    pub(crate) node: SchemaIndex,
    pub(crate) target: Option<RefTarget>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum RefTarget {
    Schema(SchemaIndex),
    Dialect(Draft),
}

/// One schema node. Boolean schemas set `boolean` and nothing else; keyword
/// schemas fill the typed slots. The raw subtree is kept for lazy re-parse
/// during pointer walks and for round-trip serialization of unknown keys.
#[derive(Debug, Default)]
pub(crate) struct SchemaNode {
    pub(crate) raw: Value,
    pub(crate) parent: Option<SchemaIndex>,
    /// Nearest ancestor (or self) that carries a non-fragment identifier.
    pub(crate) base: Option<SchemaIndex>,
    pub(crate) root: SchemaIndex,
    pub(crate) base_uri: Option<Url>,
    /// Reference table; present on the root and on nodes with an absolute id.
    pub(crate) table: Option<IndexMap<String, SchemaIndex>>,
    /// Index into the root's pending-ref list.
    pub(crate) reference: Option<usize>,
    pub(crate) boolean: Option<bool>,

    pub(crate) types: Option<TypeSlot>,
    pub(crate) enum_: Option<Vec<Value>>,
    pub(crate) const_: Option<Value>,

    pub(crate) definitions: Option<IndexMap<String, SchemaIndex>>,
    pub(crate) if_: Option<SchemaIndex>,
    pub(crate) then_: Option<SchemaIndex>,
    pub(crate) else_: Option<SchemaIndex>,
    pub(crate) all_of: Option<Vec<SchemaIndex>>,
    pub(crate) any_of: Option<Vec<SchemaIndex>>,
    pub(crate) one_of: Option<Vec<SchemaIndex>>,
    pub(crate) not: Option<SchemaIndex>,

    pub(crate) properties: Option<IndexMap<String, SchemaIndex>>,
    pub(crate) required: Option<Vec<String>>,
    pub(crate) max_properties: Option<u64>,
    pub(crate) min_properties: Option<u64>,
    pub(crate) dependencies: Option<IndexMap<String, Dependency>>,
    pub(crate) pattern_properties: Option<IndexMap<String, SchemaIndex>>,
    /// Compiled `patternProperties` regexes, in declaration order.
    pub(crate) pattern_regexps: Vec<(String, fancy_regex::Regex, SchemaIndex)>,
    pub(crate) additional_properties: Option<SchemaIndex>,
    pub(crate) property_names: Option<SchemaIndex>,

    pub(crate) items: Option<Items>,
    pub(crate) additional_items: Option<SchemaIndex>,
    pub(crate) contains: Option<SchemaIndex>,
    pub(crate) max_items: Option<u64>,
    pub(crate) min_items: Option<u64>,
    pub(crate) unique_items: Option<bool>,

    pub(crate) max_length: Option<u64>,
    pub(crate) min_length: Option<u64>,
    pub(crate) format: Option<String>,
    pub(crate) pattern: Option<String>,
    pub(crate) pattern_regexp: Option<fancy_regex::Regex>,

    pub(crate) multiple_of: Option<(BigRational, String)>,
    pub(crate) maximum: Option<Bound>,
    pub(crate) exclusive_maximum: Option<Bound>,
    pub(crate) minimum: Option<Bound>,
    pub(crate) exclusive_minimum: Option<Bound>,

    /// The ordered validator set, assembled once per node.
    pub(crate) validators: Vec<Keyword>,
}

/// A compiled schema document, ready to validate instances against.
pub struct Schema {
    pub(crate) nodes: Vec<SchemaNode>,
    pub(crate) refs: Vec<Ref>,
    pub(crate) draft: Draft,
    pub(crate) circular_ref_threshold: usize,
    pub(crate) loader: Box<dyn RemoteLoader>,
    /// Memoized fragment-path targets, so self-referential pointer refs
    /// reach a fixed point instead of recompiling forever.
    pub(crate) pointer_memo: AHashMap<(usize, String), SchemaIndex>,
}

impl Schema {
    /// Compile a schema document with the default options.
    pub fn new(document: &[u8]) -> Result<Schema, CompileError> {
        SchemaOptions::default().build(document)
    }

    /// Compilation options: draft override, circular-ref threshold for
    /// serialization and the remote loader.
    pub fn options() -> SchemaOptions {
        SchemaOptions::default()
    }

    /// The draft the root was compiled under.
    pub fn draft(&self) -> Draft {
        self.draft
    }

    /// How many levels a resolved `$ref` cycle unfolds during
    /// serialization before the literal `$ref` string is printed.
    pub fn set_circular_ref_threshold(&mut self, threshold: usize) {
        self.circular_ref_threshold = threshold;
    }

    /// An unrecognized top-level key, preserved verbatim.
    pub fn get_unknown(&self, key: &str) -> Option<&Value> {
        if serializer::is_recognized(key) {
            return None;
        }
        self.nodes[0].raw.as_object().and_then(|map| map.get(key))
    }

    /// Register another schema document so cross-document references can
    /// resolve without fetching. The document must carry an identifier.
    ///
    /// The document compiles into this root's arena, so its identifiers
    /// land in the root-level reference table and its own references join
    /// the pending list.
    pub fn add_schema(&mut self, document: &[u8]) -> Result<(), CompileError> {
        let document: Value = serde_json::from_slice(document)?;
        let mut errors = Vec::new();
        let index = self.compile_node(&document, Some(SchemaIndex(0)), &mut errors);
        if !errors.is_empty() {
            return Err(CompileError::new(errors));
        }
        if self.nodes[index.0].base_uri.is_none() {
            return Err(CompileError::new(vec![SchemaError::KeywordShape {
                keyword: "$id",
                expected: "present on schemas added to the store",
            }]));
        }
        self.resolve_local();
        Ok(())
    }

    /// `add_schema` for string input.
    pub fn add_schema_str(&mut self, document: &str) -> Result<(), CompileError> {
        self.add_schema(document.as_bytes())
    }

    /// Serialize the compiled schema back to compact JSON. Resolved
    /// references unfold up to the circular-ref threshold.
    pub fn to_json(&self) -> String {
        serializer::to_value(self).to_string()
    }

    /// Indented rendition of `to_json`.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&serializer::to_value(self)).unwrap_or_default()
    }

    pub(crate) fn compile_node(
        &mut self,
        value: &Value,
        parent: Option<SchemaIndex>,
        errors: &mut Vec<SchemaError>,
    ) -> SchemaIndex {
        let index = SchemaIndex(self.nodes.len());
        let mut node = SchemaNode {
            raw: value.clone(),
            parent,
            root: index,
            ..SchemaNode::default()
        };
        if let Some(parent) = parent {
            node.root = self.nodes[parent.0].root;
            node.base = if self.nodes[parent.0].base_uri.is_some()
                || self.nodes[parent.0].base.is_none()
            {
                Some(parent)
            } else {
                self.nodes[parent.0].base
            };
        } else {
            // The root owns the root-level reference table.
            node.table = Some(IndexMap::new());
        }
        self.nodes.push(node);

        match value {
            Value::Bool(boolean) => self.nodes[index.0].boolean = Some(*boolean),
            Value::Object(map) => {
                self.compile_identity(index, value, map, errors);
                self.compile_keywords(index, map, errors);
            }
            _ => errors.push(SchemaError::DocumentType {
                found: value::kind_of(value).to_string(),
            }),
        }

        self.assemble_validators(index);
        index
    }

    /// Identity pass: `$id`/`id` and `$ref` only.
    fn compile_identity(
        &mut self,
        index: SchemaIndex,
        value: &Value,
        map: &Map<String, Value>,
        errors: &mut Vec<SchemaError>,
    ) {
        if let Some(reference) = map.get("$ref") {
            if let Value::String(reference) = reference {
                let ref_index = self.refs.len();
                self.refs.push(Ref {
                    reference: reference.clone(),
                    node: index,
                    target: None,
                });
                self.nodes[index.0].reference = Some(ref_index);
            } else {
                errors.push(SchemaError::InvalidReference);
            }
        }

        // A node that declares `$ref` never registers its identifier; the
        // reference wins.
        if self.nodes[index.0].reference.is_some() {
            return;
        }
        let id = match schemas::id_of(self.draft, value) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return,
        };
        if id.starts_with('#') {
            // Location-independent identifier; the base URI is unchanged.
            let from = self.nodes[index.0].parent.unwrap_or(index);
            self.register(from, id, index);
        } else {
            match self.expand_uri(index, &id) {
                Ok(mut uri) => {
                    // Empty fragments are not distinguishable from absent ones.
                    if uri.fragment() == Some("") {
                        uri.set_fragment(None);
                    }
                    self.nodes[index.0].base_uri = Some(uri.clone());
                    match &mut self.nodes[index.0].table {
                        Some(table) => {
                            table.insert("#".to_string(), index);
                        }
                        table @ None => {
                            let mut seeded = IndexMap::new();
                            seeded.insert("#".to_string(), index);
                            *table = Some(seeded);
                        }
                    }
                    let from = self.nodes[index.0].parent.unwrap_or(index);
                    self.register(from, uri.to_string(), index);
                }
                Err(error) => errors.push(SchemaError::InvalidIdentifier { id, error }),
            }
        }
    }

    /// Keyword pass: every recognized keyword is parsed into its typed
    /// slot; sub-schema keywords recurse with this node as parent.
    fn compile_keywords(
        &mut self,
        index: SchemaIndex,
        map: &Map<String, Value>,
        errors: &mut Vec<SchemaError>,
    ) {
        for (key, subvalue) in map {
            match key.as_str() {
                // Identity keys were handled in the first pass; metadata
                // keywords ($comment, title, description, default,
                // examples, readOnly, writeOnly, content*) round-trip
                // through the raw subtree and are inert at validation.
                "$id" | "id" | "$ref" => {}
                "type" => self.nodes[index.0].types = parse_types(subvalue, errors),
                "enum" => match subvalue {
                    Value::Array(options) => {
                        self.nodes[index.0].enum_ = Some(options.clone());
                    }
                    _ => errors.push(SchemaError::KeywordShape {
                        keyword: "enum",
                        expected: "an array",
                    }),
                },
                "const" => self.nodes[index.0].const_ = Some(subvalue.clone()),
                "definitions" => {
                    let compiled = self.compile_schema_map(subvalue, index, "definitions", errors);
                    self.nodes[index.0].definitions = compiled;
                }
                "if" => {
                    let compiled = self.compile_subschema(subvalue, index, "if", errors);
                    self.nodes[index.0].if_ = compiled;
                }
                "then" => {
                    let compiled = self.compile_subschema(subvalue, index, "then", errors);
                    self.nodes[index.0].then_ = compiled;
                }
                "else" => {
                    let compiled = self.compile_subschema(subvalue, index, "else", errors);
                    self.nodes[index.0].else_ = compiled;
                }
                "allOf" => {
                    let compiled = self.compile_schema_list(subvalue, index, "allOf", errors);
                    self.nodes[index.0].all_of = compiled;
                }
                "anyOf" => {
                    let compiled = self.compile_schema_list(subvalue, index, "anyOf", errors);
                    self.nodes[index.0].any_of = compiled;
                }
                "oneOf" => {
                    let compiled = self.compile_schema_list(subvalue, index, "oneOf", errors);
                    self.nodes[index.0].one_of = compiled;
                }
                "not" => {
                    let compiled = self.compile_subschema(subvalue, index, "not", errors);
                    self.nodes[index.0].not = compiled;
                }
                "properties" => {
                    let compiled = self.compile_schema_map(subvalue, index, "properties", errors);
                    self.nodes[index.0].properties = compiled;
                }
                "required" => {
                    self.nodes[index.0].required = parse_strings(subvalue, "required", errors)
                }
                "maxProperties" => {
                    self.nodes[index.0].max_properties =
                        parse_limit(subvalue, "maxProperties", errors)
                }
                "minProperties" => {
                    self.nodes[index.0].min_properties =
                        parse_limit(subvalue, "minProperties", errors)
                }
                "dependencies" => {
                    let compiled = self.compile_dependencies(subvalue, index, errors);
                    self.nodes[index.0].dependencies = compiled;
                }
                "patternProperties" => {
                    let compiled =
                        self.compile_schema_map(subvalue, index, "patternProperties", errors);
                    if let Some(map) = &compiled {
                        let mut regexps = Vec::with_capacity(map.len());
                        for (pattern, child) in map {
                            match fancy_regex::Regex::new(&helpers::convert_regex(pattern)) {
                                Ok(regex) => regexps.push((pattern.clone(), regex, *child)),
                                Err(error) => errors.push(SchemaError::InvalidRegex {
                                    pattern: pattern.clone(),
                                    error: error.to_string(),
                                }),
                            }
                        }
                        self.nodes[index.0].pattern_regexps = regexps;
                    }
                    self.nodes[index.0].pattern_properties = compiled;
                }
                "additionalProperties" => {
                    let compiled =
                        self.compile_subschema(subvalue, index, "additionalProperties", errors);
                    self.nodes[index.0].additional_properties = compiled;
                }
                "propertyNames" => {
                    let compiled = self.compile_subschema(subvalue, index, "propertyNames", errors);
                    self.nodes[index.0].property_names = compiled;
                }
                "items" => {
                    let compiled = self.compile_items(subvalue, index, errors);
                    self.nodes[index.0].items = compiled;
                }
                "maxItems" => {
                    self.nodes[index.0].max_items = parse_limit(subvalue, "maxItems", errors)
                }
                "minItems" => {
                    self.nodes[index.0].min_items = parse_limit(subvalue, "minItems", errors)
                }
                "uniqueItems" => self.nodes[index.0].unique_items = subvalue.as_bool(),
                "additionalItems" => {
                    let compiled =
                        self.compile_subschema(subvalue, index, "additionalItems", errors);
                    self.nodes[index.0].additional_items = compiled;
                }
                "contains" => {
                    let compiled = self.compile_subschema(subvalue, index, "contains", errors);
                    self.nodes[index.0].contains = compiled;
                }
                "maxLength" => {
                    self.nodes[index.0].max_length = parse_limit(subvalue, "maxLength", errors)
                }
                "minLength" => {
                    self.nodes[index.0].min_length = parse_limit(subvalue, "minLength", errors)
                }
                "format" => self.nodes[index.0].format = as_string(subvalue),
                "pattern" => match subvalue {
                    Value::String(pattern) => {
                        self.nodes[index.0].pattern = Some(pattern.clone());
                        match fancy_regex::Regex::new(&helpers::convert_regex(pattern)) {
                            Ok(regex) => self.nodes[index.0].pattern_regexp = Some(regex),
                            Err(error) => errors.push(SchemaError::InvalidRegex {
                                pattern: pattern.clone(),
                                error: error.to_string(),
                            }),
                        }
                    }
                    _ => errors.push(SchemaError::KeywordShape {
                        keyword: "pattern",
                        expected: "a string",
                    }),
                },
                "multipleOf" => match subvalue {
                    Value::Number(number) => match value::decimal(number) {
                        Some(decimal) if !decimal.is_zero() => {
                            let rational = value::to_rational(&decimal);
                            self.nodes[index.0].multiple_of =
                                Some((rational, value::lexeme(number)));
                        }
                        _ => errors.push(SchemaError::KeywordShape {
                            keyword: "multipleOf",
                            expected: "a non-zero number",
                        }),
                    },
                    _ => errors.push(SchemaError::KeywordShape {
                        keyword: "multipleOf",
                        expected: "a number",
                    }),
                },
                "maximum" => {
                    self.nodes[index.0].maximum = parse_bound(subvalue, "maximum", false, errors)
                }
                "exclusiveMaximum" => {
                    self.nodes[index.0].exclusive_maximum =
                        parse_bound(subvalue, "exclusiveMaximum", true, errors)
                }
                "minimum" => {
                    self.nodes[index.0].minimum = parse_bound(subvalue, "minimum", false, errors)
                }
                "exclusiveMinimum" => {
                    self.nodes[index.0].exclusive_minimum =
                        parse_bound(subvalue, "exclusiveMinimum", true, errors)
                }
                // Unrecognized keys stay in the raw subtree and round-trip
                // untouched.
                _ => {}
            }
        }
    }

    fn compile_subschema(
        &mut self,
        value: &Value,
        parent: SchemaIndex,
        keyword: &'static str,
        errors: &mut Vec<SchemaError>,
    ) -> Option<SchemaIndex> {
        match value {
            Value::Object(_) | Value::Bool(_) => Some(self.compile_node(value, Some(parent), errors)),
            _ => {
                errors.push(SchemaError::KeywordShape {
                    keyword,
                    expected: "an object or boolean",
                });
                None
            }
        }
    }

    fn compile_schema_map(
        &mut self,
        value: &Value,
        parent: SchemaIndex,
        keyword: &'static str,
        errors: &mut Vec<SchemaError>,
    ) -> Option<IndexMap<String, SchemaIndex>> {
        match value {
            Value::Object(map) => {
                let mut compiled = IndexMap::with_capacity(map.len());
                for (name, subvalue) in map {
                    compiled.insert(name.clone(), self.compile_node(subvalue, Some(parent), errors));
                }
                Some(compiled)
            }
            _ => {
                errors.push(SchemaError::KeywordShape {
                    keyword,
                    expected: "an object",
                });
                None
            }
        }
    }

    fn compile_schema_list(
        &mut self,
        value: &Value,
        parent: SchemaIndex,
        keyword: &'static str,
        errors: &mut Vec<SchemaError>,
    ) -> Option<Vec<SchemaIndex>> {
        match value {
            Value::Array(items) => {
                let mut compiled = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(_) | Value::Bool(_) => {
                            compiled.push(self.compile_node(item, Some(parent), errors))
                        }
                        _ => errors.push(SchemaError::KeywordShape {
                            keyword,
                            expected: "an array of schemas",
                        }),
                    }
                }
                Some(compiled)
            }
            _ => {
                errors.push(SchemaError::KeywordShape {
                    keyword,
                    expected: "an array",
                });
                None
            }
        }
    }

    fn compile_dependencies(
        &mut self,
        value: &Value,
        parent: SchemaIndex,
        errors: &mut Vec<SchemaError>,
    ) -> Option<IndexMap<String, Dependency>> {
        match value {
            Value::Object(map) => {
                let mut compiled = IndexMap::with_capacity(map.len());
                for (name, subvalue) in map {
                    match subvalue {
                        Value::Array(_) => {
                            if let Some(names) = parse_strings(subvalue, "dependencies", errors) {
                                compiled.insert(name.clone(), Dependency::Keys(names));
                            }
                        }
                        Value::Object(_) | Value::Bool(_) => {
                            let child = self.compile_node(subvalue, Some(parent), errors);
                            compiled.insert(name.clone(), Dependency::Schema(child));
                        }
                        _ => errors.push(SchemaError::KeywordShape {
                            keyword: "dependencies",
                            expected: "an array or schema per entry",
                        }),
                    }
                }
                Some(compiled)
            }
            _ => {
                errors.push(SchemaError::KeywordShape {
                    keyword: "dependencies",
                    expected: "an object",
                });
                None
            }
        }
    }

    fn compile_items(
        &mut self,
        value: &Value,
        parent: SchemaIndex,
        errors: &mut Vec<SchemaError>,
    ) -> Option<Items> {
        match value {
            Value::Object(_) | Value::Bool(_) => {
                Some(Items::Single(self.compile_node(value, Some(parent), errors)))
            }
            Value::Array(items) => {
                let mut compiled = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(_) | Value::Bool(_) => {
                            compiled.push(self.compile_node(item, Some(parent), errors))
                        }
                        _ => errors.push(SchemaError::KeywordShape {
                            keyword: "items",
                            expected: "an array of schemas",
                        }),
                    }
                }
                Some(Items::Array(compiled))
            }
            _ => {
                errors.push(SchemaError::KeywordShape {
                    keyword: "items",
                    expected: "a schema or an array of schemas",
                });
                None
            }
        }
    }

    /// Register an identifier in the nearest table: the node's own, the
    /// root's, then the base's, in that order of existence.
    pub(crate) fn register(&mut self, from: SchemaIndex, key: String, target: SchemaIndex) {
        let mut candidates = vec![from, self.nodes[from.0].root];
        if let Some(base) = self.nodes[from.0].base {
            candidates.push(base);
        }
        for candidate in candidates {
            if let Some(table) = &mut self.nodes[candidate.0].table {
                table.insert(key, target);
                return;
            }
        }
        let root = self.nodes[from.0].root;
        self.nodes[root.0]
            .table
            .get_or_insert_with(IndexMap::new)
            .insert(key, target);
    }

    /// Look an identifier up: own table first, then the root's, then the
    /// base's. A node whose own base URI equals the key matches itself.
    pub(crate) fn get_pointer(&self, from: SchemaIndex, key: &str) -> Option<SchemaIndex> {
        let node = &self.nodes[from.0];
        if let Some(uri) = &node.base_uri {
            if uri.as_str() == key {
                return Some(from);
            }
        }
        if let Some(found) = node.table.as_ref().and_then(|table| table.get(key)) {
            return Some(*found);
        }
        if let Some(found) = self.nodes[node.root.0]
            .table
            .as_ref()
            .and_then(|table| table.get(key))
        {
            return Some(*found);
        }
        if let Some(base) = node.base {
            if let Some(found) = self.nodes[base.0]
                .table
                .as_ref()
                .and_then(|table| table.get(key))
            {
                return Some(*found);
            }
        }
        None
    }

    /// Resolve a URI against the nearest enclosing base URI (RFC 3986
    /// merge); the default scope applies when no ancestor declares one.
    pub(crate) fn expand_uri(
        &self,
        at: SchemaIndex,
        uri: &str,
    ) -> Result<Url, url::ParseError> {
        Url::options()
            .base_url(Some(self.nearest_base_uri(at)))
            .parse(uri)
    }

    pub(crate) fn nearest_base_uri(&self, at: SchemaIndex) -> &Url {
        let mut current = Some(at);
        while let Some(index) = current {
            if let Some(uri) = &self.nodes[index.0].base_uri {
                return uri;
            }
            current = self.nodes[index.0].base;
        }
        &DEFAULT_SCOPE
    }

    /// The schema `#` refers to from a node: the nearest ancestor (or the
    /// node itself) with a non-fragment identifier, or the node's root.
    pub(crate) fn base_schema_of(&self, index: SchemaIndex) -> SchemaIndex {
        let mut current = Some(index);
        while let Some(idx) = current {
            if self.nodes[idx.0].base_uri.is_some() {
                return idx;
            }
            current = self.nodes[idx.0].base;
        }
        self.nodes[index.0].root
    }

    /// The fixed validator ordering. With `$ref` present only the value
    /// and ref validators run; every other keyword at the node is inert.
    fn assemble_validators(&mut self, index: SchemaIndex) {
        let node = &self.nodes[index.0];
        let mut validators = vec![Keyword::Value];
        if node.boolean.is_some() {
            validators.push(Keyword::BooleanSchema);
        }
        if node.reference.is_some() {
            validators.push(Keyword::Ref);
            self.nodes[index.0].validators = validators;
            return;
        }
        if node.items.is_some()
            || node.additional_items.is_some()
            || node.contains.is_some()
            || node.unique_items == Some(true)
            || node.max_items.is_some()
            || node.min_items.is_some()
        {
            validators.push(Keyword::Items);
        }
        if node.properties.is_some()
            || node.pattern_properties.is_some()
            || node.additional_properties.is_some()
            || node.max_properties.is_some()
            || node.min_properties.is_some()
        {
            validators.push(Keyword::Properties);
        }
        if node.property_names.is_some() {
            validators.push(Keyword::PropertyNames);
        }
        if node.types.is_some() {
            validators.push(Keyword::Type);
        }
        if node.pattern.is_some() {
            validators.push(Keyword::Pattern);
        }
        if node.required.is_some() {
            validators.push(Keyword::Required);
        }
        if node.dependencies.is_some() {
            validators.push(Keyword::Dependencies);
        }
        if node.all_of.is_some() {
            validators.push(Keyword::AllOf);
        }
        if node.any_of.is_some() {
            validators.push(Keyword::AnyOf);
        }
        if node.one_of.is_some() {
            validators.push(Keyword::OneOf);
        }
        if node.not.is_some() {
            validators.push(Keyword::Not);
        }
        if node.multiple_of.is_some() {
            validators.push(Keyword::MultipleOf);
        }
        if node.maximum.is_some() || node.exclusive_maximum.is_some() {
            validators.push(Keyword::Maximum);
        }
        if node.minimum.is_some() || node.exclusive_minimum.is_some() {
            validators.push(Keyword::Minimum);
        }
        if node.max_length.is_some() {
            validators.push(Keyword::MaxLength);
        }
        if node.min_length.is_some() {
            validators.push(Keyword::MinLength);
        }
        if node.enum_.is_some() {
            validators.push(Keyword::Enum);
        }
        if node.const_.is_some() {
            validators.push(Keyword::Const);
        }
        if node.if_.is_some() {
            validators.push(Keyword::IfThenElse);
        }
        if node.format.is_some() {
            validators.push(Keyword::Format);
        }
        self.nodes[index.0].validators = validators;
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serializer::to_value(self))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("draft", &self.draft)
            .field("nodes", &self.nodes.len())
            .field("refs", &self.refs.len())
            .finish()
    }
}

/// Configuration for schema compilation.
///
/// The draft is detected in the following precedence order: explicitly
/// specified, the `$schema` key of the document, draft 7.
pub struct SchemaOptions {
    draft: Option<Draft>,
    circular_ref_threshold: usize,
    loader: Box<dyn RemoteLoader>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        SchemaOptions {
            draft: None,
            circular_ref_threshold: 3,
            loader: Box::new(DenyAllLoader),
        }
    }
}

impl fmt::Debug for SchemaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaOptions")
            .field("draft", &self.draft)
            .field("circular_ref_threshold", &self.circular_ref_threshold)
            .finish()
    }
}

impl SchemaOptions {
    /// Compile under the given draft regardless of the document's `$schema`.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Unfold depth for serializing cyclic reference graphs (default 3).
    pub fn with_circular_ref_threshold(mut self, threshold: usize) -> Self {
        self.circular_ref_threshold = threshold;
        self
    }

    /// The collaborator used to fetch remote schemas. The default refuses
    /// every fetch.
    pub fn with_remote_loader(mut self, loader: impl RemoteLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Compile `document` using the configured options.
    pub fn build(self, document: &[u8]) -> Result<Schema, CompileError> {
        let document: Value = serde_json::from_slice(document)?;
        let draft = self
            .draft
            .or_else(|| schemas::draft_from_schema(&document))
            .unwrap_or_default();
        let mut schema = Schema {
            nodes: Vec::new(),
            refs: Vec::new(),
            draft,
            circular_ref_threshold: self.circular_ref_threshold,
            loader: self.loader,
            pointer_memo: AHashMap::new(),
        };
        let mut errors = Vec::new();
        schema.compile_node(&document, None, &mut errors);
        if !errors.is_empty() {
            log::debug!("schema compilation produced {} error(s)", errors.len());
            return Err(CompileError::new(errors));
        }
        // Wire up whatever resolves without fetching, so purely internal
        // references validate without an explicit resolve step.
        schema.resolve_local();
        Ok(schema)
    }

    /// `build` for string input.
    pub fn build_str(self, document: &str) -> Result<Schema, CompileError> {
        self.build(document.as_bytes())
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn parse_types(value: &Value, errors: &mut Vec<SchemaError>) -> Option<TypeSlot> {
    match value {
        Value::String(name) => match PrimitiveType::try_from(name.as_str()) {
            Ok(primitive) => Some(TypeSlot::Single(primitive)),
            Err(()) => {
                errors.push(SchemaError::UnknownType {
                    value: name.clone(),
                });
                None
            }
        },
        Value::Array(items) => {
            let mut types = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(name) => match PrimitiveType::try_from(name.as_str()) {
                        Ok(primitive) => types.push(primitive),
                        Err(()) => errors.push(SchemaError::UnknownType {
                            value: name.clone(),
                        }),
                    },
                    _ => errors.push(SchemaError::KeywordShape {
                        keyword: "type",
                        expected: "a string or an array of strings",
                    }),
                }
            }
            Some(TypeSlot::Multiple(types))
        }
        _ => {
            errors.push(SchemaError::KeywordShape {
                keyword: "type",
                expected: "a string or an array of strings",
            });
            None
        }
    }
}

fn parse_strings(
    value: &Value,
    keyword: &'static str,
    errors: &mut Vec<SchemaError>,
) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => {
            let mut strings = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(string) => strings.push(string.to_string()),
                    None => errors.push(SchemaError::KeywordShape {
                        keyword,
                        expected: "an array of strings",
                    }),
                }
            }
            Some(strings)
        }
        _ => {
            errors.push(SchemaError::KeywordShape {
                keyword,
                expected: "an array",
            });
            None
        }
    }
}

fn parse_limit(value: &Value, keyword: &'static str, errors: &mut Vec<SchemaError>) -> Option<u64> {
    match value.as_u64() {
        Some(limit) => Some(limit),
        None => {
            errors.push(SchemaError::KeywordShape {
                keyword,
                expected: "a non-negative integer",
            });
            None
        }
    }
}

fn parse_bound(
    value: &Value,
    keyword: &'static str,
    allow_flag: bool,
    errors: &mut Vec<SchemaError>,
) -> Option<Bound> {
    match value {
        Value::Number(number) => match BigDecimal::from_str(&number.to_string()) {
            Ok(decimal) => Some(Bound::Limit {
                value: decimal,
                lexeme: value::lexeme(number),
            }),
            Err(_) => {
                errors.push(SchemaError::KeywordShape {
                    keyword,
                    expected: "a number",
                });
                None
            }
        },
        Value::Bool(flag) if allow_flag => Some(Bound::Flag(*flag)),
        _ => {
            errors.push(SchemaError::KeywordShape {
                keyword,
                expected: if allow_flag {
                    "a number or boolean"
                } else {
                    "a number"
                },
            });
            None
        }
    }
}
