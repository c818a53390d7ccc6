//! Spec normalization
//!
//! OpenAPI allows parameters shared by every method of an endpoint to be
//! declared once at the endpoint level. Pushing them down into each
//! operation gives downstream consumers exactly one shape to handle.

use serde_json::Value;

/// Hoist endpoint-level `parameters` into every operation of that
/// endpoint, in place.
///
/// Shared parameters are appended after the operation-specific ones, in
/// their original order; afterwards every operation has a `parameters`
/// key (possibly empty) and no endpoint keeps a top-level one. Applying
/// this to an already-normalized tree is a no-op.
pub fn normalize(tree: &mut Value) {
    let Some(paths) = tree.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };

    for endpoint in paths.values_mut() {
        let Some(endpoint) = endpoint.as_object_mut() else {
            continue;
        };

        let shared = match endpoint.shift_remove("parameters") {
            Some(Value::Array(params)) => params,
            _ => Vec::new(),
        };

        for operation in endpoint.values_mut() {
            let Some(operation) = operation.as_object_mut() else {
                continue;
            };
            let parameters = operation
                .entry("parameters")
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(list) = parameters {
                list.extend(shared.iter().cloned());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shared_parameters_are_appended_after_operation_ones() {
        let mut tree = json!({
            "paths": {
                "/items": {
                    "parameters": [{"name": "P1", "in": "query"}],
                    "get": {"parameters": [{"name": "P2", "in": "query"}]}
                }
            }
        });
        normalize(&mut tree);

        let get = &tree["paths"]["/items"]["get"]["parameters"];
        assert_eq!(get[0]["name"], "P2");
        assert_eq!(get[1]["name"], "P1");
        assert!(tree["paths"]["/items"].get("parameters").is_none());
    }

    #[test]
    fn test_operation_without_parameters_gets_empty_list() {
        let mut tree = json!({
            "paths": {"/pets": {"get": {"responses": {}}}}
        });
        normalize(&mut tree);
        assert_eq!(tree["paths"]["/pets"]["get"]["parameters"], json!([]));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut tree = json!({
            "paths": {
                "/items": {
                    "parameters": [{"name": "P1", "in": "query"}],
                    "get": {"parameters": [{"name": "P2", "in": "query"}]},
                    "post": {}
                }
            }
        });
        normalize(&mut tree);
        let once = tree.clone();
        normalize(&mut tree);
        assert_eq!(tree, once);
    }

    #[test]
    fn test_method_order_survives_parameter_removal() {
        // `parameters` sits between two methods; removing it must not
        // perturb method order.
        let mut tree = serde_json::from_str::<Value>(
            r#"{"paths": {"/items": {
                "get": {},
                "parameters": [{"name": "P1", "in": "query"}],
                "post": {}
            }}}"#,
        )
        .unwrap();
        normalize(&mut tree);

        let methods: Vec<&String> = tree["paths"]["/items"].as_object().unwrap().keys().collect();
        assert_eq!(methods, ["get", "post"]);
    }

    #[test]
    fn test_missing_paths_is_a_no_op() {
        let mut tree = json!({"swagger": "2.0"});
        normalize(&mut tree);
        assert_eq!(tree, json!({"swagger": "2.0"}));
    }
}
