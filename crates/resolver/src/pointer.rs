//! JSON pointer evaluation (RFC 6901)
//!
//! The fragment part of a `$ref` is a `/`-separated pointer into a
//! document. Segments unescape `~1` to `/` first, then `~0` to `~`.

use serde_json::Value;

/// Unescape one pointer segment
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Look up a pointer (the fragment of a reference URI, without the
/// leading `#`) in a document. An empty pointer designates the whole
/// document. Returns `None` when any segment does not exist.
pub fn lookup<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(document);
    }

    let mut node = document;
    for segment in pointer.strip_prefix('/').unwrap_or(pointer).split('/') {
        let segment = unescape(segment);
        node = match node {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested_object() {
        let doc = json!({"definitions": {"Pet": {"type": "object"}}});
        let found = lookup(&doc, "/definitions/Pet").unwrap();
        assert_eq!(found, &json!({"type": "object"}));
    }

    #[test]
    fn test_lookup_escaped_path_segments() {
        let doc = json!({"paths": {"/pets/{id}": {"get": {"summary": "one pet"}}}});
        let found = lookup(&doc, "/paths/~1pets~1{id}/get").unwrap();
        assert_eq!(found, &json!({"summary": "one pet"}));
    }

    #[test]
    fn test_unescape_order_is_tilde_one_first() {
        // "~01" decodes to the literal "~1", not "/"
        assert_eq!(unescape("~01"), "~1");
        assert_eq!(unescape("a~1b~0c"), "a/b~c");
    }

    #[test]
    fn test_lookup_array_index() {
        let doc = json!({"parameters": [{"name": "first"}, {"name": "second"}]});
        let found = lookup(&doc, "/parameters/1/name").unwrap();
        assert_eq!(found, &json!("second"));
    }

    #[test]
    fn test_lookup_missing_segment() {
        let doc = json!({"definitions": {}});
        assert!(lookup(&doc, "/definitions/Pet").is_none());
        assert!(lookup(&doc, "/definitions/Pet/type").is_none());
    }

    #[test]
    fn test_empty_pointer_is_whole_document() {
        let doc = json!({"a": 1});
        assert_eq!(lookup(&doc, "").unwrap(), &doc);
    }
}
