//! JSON reference resolution
//!
//! An OpenAPI spec may contain JSON references to its own nodes or to
//! external documents, so nothing downstream can rely on an expected
//! attribute actually being present until every reference has been
//! replaced with the object it points to. For the reference syntax see
//! <https://tools.ietf.org/html/draft-pbryan-zyp-json-ref-02>.
//!
//! `resolve` consumes the tree and returns the dereferenced tree; callers
//! must rebind to the returned value.

use crate::fetch::{DocumentFetcher, StdFetcher};
use crate::pointer;
use openapi_rst_common::{Result, SpecError};
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;
use url::Url;

/// The document and base URL a reference is interpreted against.
///
/// References inside a fetched external document resolve against that
/// document, not against the root spec, so every substitution carries its
/// target's scope into the walk of the substituted subtree.
#[derive(Clone)]
struct Scope {
    base: Option<Url>,
    doc: Rc<Value>,
}

/// Replaces every `$ref` node in a document tree with the object it
/// points to.
///
/// Supports three reference forms: fragment-only pointers into the same
/// document (`#/definitions/Pet`), relative file paths with a fragment
/// (`common.yaml#/Error`), and absolute URIs to external documents.
/// External documents are fetched once per resolver instance and cached
/// by their absolute URL.
///
/// Substituted subtrees are resolved eagerly under the target document's
/// scope, so chains of references expand transitively; cyclic reference
/// graphs are rejected with [`SpecError::Cycle`].
pub struct RefResolver<F = StdFetcher> {
    base: Option<Url>,
    fetcher: F,
    root: Option<Rc<Value>>,
    cache: HashMap<String, Rc<Value>>,
    in_flight: Vec<String>,
}

impl RefResolver<StdFetcher> {
    /// Create a resolver anchored at `base_uri`.
    ///
    /// Pass an empty string when the tree has no file origin; only
    /// fragment-only references can be resolved then.
    pub fn new(base_uri: &str) -> Result<Self> {
        Self::with_fetcher(base_uri, StdFetcher::new()?)
    }
}

impl<F: DocumentFetcher> RefResolver<F> {
    /// Create a resolver with a custom fetch collaborator
    pub fn with_fetcher(base_uri: &str, fetcher: F) -> Result<Self> {
        let base = if base_uri.is_empty() {
            None
        } else {
            let mut url = Url::parse(base_uri).map_err(|e| {
                SpecError::ReferenceResolution(format!("invalid base URI {}: {}", base_uri, e))
            })?;
            url.set_fragment(None);
            Some(url)
        };

        Ok(Self {
            base,
            fetcher,
            root: None,
            cache: HashMap::new(),
            in_flight: Vec::new(),
        })
    }

    /// Resolve every reference in `tree` and return the dereferenced
    /// tree. Consumes the resolver; the fetch cache is scoped to this
    /// one call.
    pub fn resolve(mut self, tree: Value) -> Result<Value> {
        // Same-document pointers look targets up in a pre-resolution
        // snapshot of the root.
        let snapshot = Rc::new(tree.clone());
        self.root = Some(Rc::clone(&snapshot));

        let scope = Scope {
            base: self.base.clone(),
            doc: snapshot,
        };
        self.walk(tree, &scope)
    }

    fn walk(&mut self, node: Value, scope: &Scope) -> Result<Value> {
        match node {
            Value::Object(map) if map.contains_key("$ref") => {
                let reference = map
                    .get("$ref")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        SpecError::ReferenceResolution("$ref value is not a string".to_string())
                    })?
                    .to_string();
                self.substitute(&reference, scope)
            }
            Value::Object(mut map) => {
                for value in map.values_mut() {
                    let taken = std::mem::take(value);
                    *value = self.walk(taken, scope)?;
                }
                Ok(Value::Object(map))
            }
            Value::Array(mut items) => {
                for item in items.iter_mut() {
                    let taken = std::mem::take(item);
                    *item = self.walk(taken, scope)?;
                }
                Ok(Value::Array(items))
            }
            scalar => Ok(scalar),
        }
    }

    /// Replace one reference node with its target and resolve references
    /// within the substituted subtree under the target's scope.
    fn substitute(&mut self, reference: &str, scope: &Scope) -> Result<Value> {
        let (target, target_scope, key) = self.locate(reference, scope)?;

        if self.in_flight.contains(&key) {
            return Err(SpecError::Cycle(reference.to_string()));
        }

        log::debug!("resolving {}", key);
        self.in_flight.push(key);
        let result = self.walk(target, &target_scope);
        self.in_flight.pop();
        result
    }

    /// Find the target of a reference: a clone of the target value, the
    /// scope it was found in, and a document-qualified key identifying
    /// the reference for cycle detection.
    fn locate(&mut self, reference: &str, scope: &Scope) -> Result<(Value, Scope, String)> {
        // Fragment-only: a pointer into the current document
        if let Some(fragment) = reference.strip_prefix('#') {
            let target = pointer::lookup(&scope.doc, fragment)
                .ok_or_else(|| {
                    SpecError::ReferenceResolution(format!("{} not found in document", reference))
                })?
                .clone();
            let key = format!(
                "{}#{}",
                scope.base.as_ref().map(Url::as_str).unwrap_or(""),
                fragment
            );
            return Ok((target, scope.clone(), key));
        }

        // Relative or absolute URI, possibly with a fragment
        let url = match &scope.base {
            Some(base) => base.join(reference).map_err(|e| {
                SpecError::ReferenceResolution(format!("invalid reference {}: {}", reference, e))
            })?,
            None => Url::parse(reference).map_err(|_| {
                SpecError::ReferenceResolution(format!(
                    "relative reference {} cannot be resolved without a base URI",
                    reference
                ))
            })?,
        };

        let fragment = url.fragment().unwrap_or("").to_string();
        let mut doc_url = url;
        doc_url.set_fragment(None);

        let doc = self.document(&doc_url)?;
        let target = pointer::lookup(&doc, &fragment)
            .ok_or_else(|| {
                SpecError::ReferenceResolution(format!(
                    "{} not found in {}",
                    reference, doc_url
                ))
            })?
            .clone();

        let key = format!("{}#{}", doc_url, fragment);
        let target_scope = Scope {
            base: Some(doc_url),
            doc,
        };
        Ok((target, target_scope, key))
    }

    /// The document behind `url`: the root spec when the URL matches the
    /// base, a cached external document, or a fresh fetch.
    fn document(&mut self, url: &Url) -> Result<Rc<Value>> {
        if self.base.as_ref() == Some(url) {
            if let Some(root) = &self.root {
                return Ok(Rc::clone(root));
            }
        }

        if let Some(doc) = self.cache.get(url.as_str()) {
            log::trace!("document cache hit for {}", url);
            return Ok(Rc::clone(doc));
        }

        log::debug!("fetching external document {}", url);
        let doc = Rc::new(self.fetcher.fetch(url)?);
        self.cache.insert(url.as_str().to_string(), Rc::clone(&doc));
        Ok(doc)
    }
}

/// Resolve every JSON reference in `tree` (convenience wrapper creating a
/// single-use [`RefResolver`] with the default fetcher).
pub fn resolve_refs(base_uri: &str, tree: Value) -> Result<Value> {
    RefResolver::new(base_uri)?.resolve(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockDocumentFetcher;
    use serde_json::json;

    fn resolve(tree: Value) -> Result<Value> {
        let fetcher = MockDocumentFetcher::new();
        RefResolver::with_fetcher("", fetcher)?.resolve(tree)
    }

    #[test]
    fn test_fragment_reference_is_replaced() {
        let tree = json!({
            "definitions": {"Pet": {"type": "object"}},
            "schema": {"$ref": "#/definitions/Pet"}
        });
        let resolved = resolve(tree).unwrap();
        assert_eq!(resolved["schema"], json!({"type": "object"}));
    }

    #[test]
    fn test_escaped_path_pointer() {
        let tree = json!({
            "paths": {"/pets/{id}": {"get": {"summary": "one pet"}}},
            "link": {"$ref": "#/paths/~1pets~1{id}/get"}
        });
        let resolved = resolve(tree).unwrap();
        assert_eq!(resolved["link"], json!({"summary": "one pet"}));
    }

    #[test]
    fn test_missing_target_names_reference() {
        let tree = json!({"schema": {"$ref": "#/definitions/Pet"}});
        let err = resolve(tree).unwrap_err();
        assert!(matches!(err, SpecError::ReferenceResolution(_)));
        assert!(err.to_string().contains("#/definitions/Pet"));
    }

    #[test]
    fn test_nested_references_resolve_transitively() {
        let tree = json!({
            "definitions": {
                "Pets": {"type": "array", "items": {"$ref": "#/definitions/Pet"}},
                "Pet": {"type": "object"}
            },
            "schema": {"$ref": "#/definitions/Pets"}
        });
        let resolved = resolve(tree).unwrap();
        assert_eq!(
            resolved["schema"],
            json!({"type": "array", "items": {"type": "object"}})
        );
    }

    #[test]
    fn test_reference_to_reference_chain() {
        let tree = json!({
            "definitions": {
                "A": {"$ref": "#/definitions/B"},
                "B": {"type": "string"}
            },
            "schema": {"$ref": "#/definitions/A"}
        });
        let resolved = resolve(tree).unwrap();
        assert_eq!(resolved["schema"], json!({"type": "string"}));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let tree = json!({
            "definitions": {
                "A": {"items": {"$ref": "#/definitions/B"}},
                "B": {"items": {"$ref": "#/definitions/A"}}
            },
            "schema": {"$ref": "#/definitions/A"}
        });
        let err = resolve(tree).unwrap_err();
        assert!(matches!(err, SpecError::Cycle(_)));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let tree = json!({
            "definitions": {"A": {"$ref": "#/definitions/A"}},
            "schema": {"$ref": "#/definitions/A"}
        });
        let err = resolve(tree).unwrap_err();
        assert!(matches!(err, SpecError::Cycle(_)));
    }

    #[test]
    fn test_external_reference_uses_fetcher() {
        let mut fetcher = MockDocumentFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url| url.as_str() == "https://example.com/common.json")
            .times(1)
            .returning(|_| Ok(json!({"Error": {"type": "object", "required": ["code"]}})));

        let tree = json!({
            "schema": {"$ref": "https://example.com/common.json#/Error"}
        });
        let resolved = RefResolver::with_fetcher("", fetcher)
            .unwrap()
            .resolve(tree)
            .unwrap();
        assert_eq!(
            resolved["schema"],
            json!({"type": "object", "required": ["code"]})
        );
    }

    #[test]
    fn test_external_document_is_fetched_once() {
        let mut fetcher = MockDocumentFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(json!({"Error": {"type": "object"}, "Other": {"type": "string"}})));

        let tree = json!({
            "a": {"$ref": "https://example.com/common.json#/Error"},
            "b": {"$ref": "https://example.com/common.json#/Other"}
        });
        let resolved = RefResolver::with_fetcher("", fetcher)
            .unwrap()
            .resolve(tree)
            .unwrap();
        assert_eq!(resolved["a"], json!({"type": "object"}));
        assert_eq!(resolved["b"], json!({"type": "string"}));
    }

    #[test]
    fn test_relative_reference_without_base_fails() {
        let tree = json!({"schema": {"$ref": "common.json#/Error"}});
        let err = resolve(tree).unwrap_err();
        assert!(matches!(err, SpecError::ReferenceResolution(_)));
        assert!(err.to_string().contains("common.json"));
    }

    #[test]
    fn test_fragment_inside_external_document_resolves_there() {
        let mut fetcher = MockDocumentFetcher::new();
        fetcher.expect_fetch().times(1).returning(|_| {
            Ok(json!({
                "Error": {"detail": {"$ref": "#/Detail"}},
                "Detail": {"type": "string"}
            }))
        });

        let tree = json!({
            "schema": {"$ref": "https://example.com/common.json#/Error"}
        });
        let resolved = RefResolver::with_fetcher("", fetcher)
            .unwrap()
            .resolve(tree)
            .unwrap();
        assert_eq!(resolved["schema"], json!({"detail": {"type": "string"}}));
    }

    #[test]
    fn test_non_string_ref_fails() {
        let tree = json!({"schema": {"$ref": 42}});
        let err = resolve(tree).unwrap_err();
        assert!(matches!(err, SpecError::ReferenceResolution(_)));
    }

    #[test]
    fn test_scalars_and_arrays_pass_through() {
        let tree = json!({"a": [1, "two", null, true], "b": 3.5});
        let resolved = resolve(tree.clone()).unwrap();
        assert_eq!(resolved, tree);
    }
}
