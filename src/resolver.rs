//! Reference resolution. Walks the root's pending `$ref` list, caching a
//! target on every reference; the list may grow while it is walked, since
//! remote documents and pointer targets compile into the same arena.
use crate::{
    compilation::{RefTarget, Schema, SchemaIndex},
    error::ResolveError,
    helpers, schemas,
};
use serde_json::Value;
use url::Url;

/// Loads the raw bytes of remote schema documents.
///
/// The resolver calls this for any absolute URI that is neither in the
/// reference table nor a known meta-schema location. The default
/// implementation refuses every fetch; enable the `reqwest` feature and
/// install [`HttpLoader`] for real HTTP retrieval, or bring your own
/// (cached, sandboxed, ...) implementation.
pub trait RemoteLoader: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, ResolveError>;
}

/// The default loader: refuses by policy.
#[derive(Debug, Default)]
pub struct DenyAllLoader;

impl RemoteLoader for DenyAllLoader {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, ResolveError> {
        log::debug!("refusing to fetch remote schema {}", url);
        Err(ResolveError::Fetch {
            url: url.to_string(),
            message: "remote schema loading is disabled; install a RemoteLoader to allow it"
                .to_string(),
        })
    }
}

/// Blocking HTTP(S) loader.
#[cfg(feature = "reqwest")]
#[derive(Debug, Default)]
pub struct HttpLoader;

#[cfg(feature = "reqwest")]
impl RemoteLoader for HttpLoader {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, ResolveError> {
        match url.scheme() {
            "http" | "https" => {
                log::debug!("fetching remote schema {}", url);
                let response =
                    reqwest::blocking::get(url.as_str()).map_err(|error| ResolveError::Fetch {
                        url: url.to_string(),
                        message: error.to_string(),
                    })?;
                let body = response.bytes().map_err(|error| ResolveError::Fetch {
                    url: url.to_string(),
                    message: error.to_string(),
                })?;
                Ok(body.to_vec())
            }
            scheme => Err(ResolveError::Fetch {
                url: url.to_string(),
                message: format!("unknown scheme: {}", scheme),
            }),
        }
    }
}

impl Schema {
    /// Resolve every pending reference, loading remote documents through
    /// the configured loader. Idempotent: targets are cached on the
    /// reference, and an already-wired reference is left alone.
    pub fn resolve_refs(&mut self) -> Result<(), ResolveError> {
        let mut index = 0;
        while index < self.refs.len() {
            if self.refs[index].target.is_none() {
                let node = self.refs[index].node;
                let reference = self.refs[index].reference.clone();
                let target = self.resolve_reference(node, &reference, true)?;
                self.refs[index].target = Some(target);
            }
            index += 1;
        }
        Ok(())
    }

    /// Best-effort pass run after compilation: wires whatever resolves
    /// without fetching and leaves the rest pending.
    pub(crate) fn resolve_local(&mut self) {
        let mut index = 0;
        while index < self.refs.len() {
            if self.refs[index].target.is_none() {
                let node = self.refs[index].node;
                let reference = self.refs[index].reference.clone();
                if let Ok(target) = self.resolve_reference(node, &reference, false) {
                    self.refs[index].target = Some(target);
                }
            }
            index += 1;
        }
    }

    fn resolve_reference(
        &mut self,
        node: SchemaIndex,
        reference: &str,
        allow_fetch: bool,
    ) -> Result<RefTarget, ResolveError> {
        if reference.is_empty() {
            return Err(ResolveError::InvalidReference {
                reference: reference.to_string(),
            });
        }
        let base = self.base_schema_of(node);

        if reference == "#" {
            return Ok(RefTarget::Schema(base));
        }
        if let Some(rest) = reference.strip_prefix("#/") {
            return self.resolve_pointer(base, reference, rest);
        }
        if reference.starts_with('#') {
            return match self.get_pointer(base, reference) {
                Some(found) => Ok(RefTarget::Schema(found)),
                None => Err(ResolveError::UnresolvedReference {
                    reference: reference.to_string(),
                }),
            };
        }

        let uri = self
            .expand_uri(base, reference)
            .map_err(|_| ResolveError::InvalidReference {
                reference: reference.to_string(),
            })?;
        if let Some(draft) = schemas::meta_schema_for_url(&uri) {
            return Ok(RefTarget::Dialect(draft));
        }

        // Location-independent identifiers may carry the fragment in the
        // registered key, so the full URI is searched first.
        if let Some(found) = self.get_pointer(node, uri.as_str()) {
            return Ok(RefTarget::Schema(found));
        }

        let mut fragmentless = uri.clone();
        fragmentless.set_fragment(None);
        let fragment = uri.fragment().unwrap_or("").to_string();

        if let Some(found) = self.get_pointer(node, fragmentless.as_str()) {
            if fragment.is_empty() {
                return Ok(RefTarget::Schema(found));
            }
            return self.resolve_reference(found, &format!("#{}", fragment), allow_fetch);
        }

        if !allow_fetch {
            return Err(ResolveError::UnresolvedReference {
                reference: reference.to_string(),
            });
        }
        let loaded = self.load_remote(node, &fragmentless)?;
        if fragment.is_empty() {
            return Ok(RefTarget::Schema(loaded));
        }
        self.resolve_reference(loaded, &format!("#{}", fragment), allow_fetch)
    }

    /// Fetch, compile and register a remote document. Its `$id` is
    /// injected from the fetch URL when absent so later lookups hit the
    /// reference table instead of the network.
    fn load_remote(
        &mut self,
        node: SchemaIndex,
        url: &Url,
    ) -> Result<SchemaIndex, ResolveError> {
        let body = self.loader.fetch(url)?;
        let mut document: Value = serde_json::from_slice(&body)?;
        if let Value::Object(map) = &mut document {
            let id_key = if self.draft == schemas::Draft::Draft4 {
                "id"
            } else {
                "$id"
            };
            if !map.contains_key(id_key) {
                map.insert(id_key.to_string(), Value::String(url.to_string()));
            }
        }
        let mut errors = Vec::new();
        let loaded = self.compile_node(&document, None, &mut errors);
        if !errors.is_empty() {
            return Err(ResolveError::Compile(crate::error::CompileError::new(
                errors,
            )));
        }
        if self.nodes[loaded.0].base_uri.is_none() {
            self.nodes[loaded.0].base_uri = Some(url.clone());
        }
        self.register(node, url.to_string(), loaded);
        log::debug!("registered remote schema {}", url);
        Ok(loaded)
    }

    /// Fragment-path resolution: URL-decode and pointer-unescape each
    /// segment, walk the base schema's raw document and re-compile the
    /// reached subtree at every step, bound to the base's context. The
    /// final target is memoized per `(base, reference)` so cyclic pointer
    /// refs close on themselves.
    fn resolve_pointer(
        &mut self,
        base: SchemaIndex,
        reference: &str,
        rest: &str,
    ) -> Result<RefTarget, ResolveError> {
        let memo_key = (base.0, reference.to_string());
        if let Some(found) = self.pointer_memo.get(&memo_key) {
            return Ok(RefTarget::Schema(*found));
        }

        let trimmed = rest.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(RefTarget::Schema(base));
        }

        let mut current = base;
        let mut raw = self.nodes[base.0].raw.clone();
        let mut target = None;
        for segment in trimmed.split('/') {
            let next = match &raw {
                Value::Array(items) => helpers::parse_index(segment)
                    .and_then(|position| items.get(position))
                    .cloned(),
                Value::Object(_) => raw
                    .as_object()
                    .and_then(|map| map.get(&helpers::unescape_pointer_segment(segment)))
                    .cloned(),
                _ => None,
            };
            let next = next.ok_or_else(|| ResolveError::PointerWalk {
                reference: reference.to_string(),
            })?;
            // Array steps (e.g. the list in `#/items/1`) are not schemas
            // themselves; only object and boolean steps compile.
            target = match &next {
                Value::Object(_) | Value::Bool(_) => {
                    let mut errors = Vec::new();
                    let compiled = self.compile_node(&next, Some(current), &mut errors);
                    if !errors.is_empty() {
                        return Err(ResolveError::PointerWalk {
                            reference: reference.to_string(),
                        });
                    }
                    current = compiled;
                    Some(compiled)
                }
                _ => None,
            };
            raw = next;
        }

        match target {
            Some(found) => {
                self.pointer_memo.insert(memo_key, found);
                // Newly created nodes may carry references of their own;
                // the resolve loop picks them up because the pending list
                // only grows.
                Ok(RefTarget::Schema(found))
            }
            // The walk ended on something that cannot be a schema.
            None => Err(ResolveError::PointerWalk {
                reference: reference.to_string(),
            }),
        }
    }
}
