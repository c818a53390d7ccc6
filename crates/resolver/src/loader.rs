//! Spec file loading
//!
//! Reads OpenAPI documents from disk, detects JSON vs YAML and parses
//! them into an order-preserving value tree. Key order matters: endpoints
//! are often grouped logically in the source document and the rendered
//! output must keep that grouping.

use openapi_rst_common::{Result, SpecError};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Spec document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

/// Load a spec file, detecting its format from the extension and falling
/// back to a content sniff.
pub fn load_spec<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        SpecError::MalformedSpec(format!("failed to read spec file {}: {}", path.display(), e))
    })?;

    parse_spec(&content, detect_format(path, &content))
}

/// Detect the spec format from the file extension, falling back to a
/// content sniff for unknown extensions.
pub fn detect_format(path: &Path, content: &str) -> SpecFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => SpecFormat::Json,
        Some("yaml") | Some("yml") => SpecFormat::Yaml,
        _ => sniff_format(content),
    }
}

/// Guess the format from the document text itself
pub fn sniff_format(content: &str) -> SpecFormat {
    if content.trim_start().starts_with('{') {
        SpecFormat::Json
    } else {
        SpecFormat::Yaml
    }
}

/// Parse spec text into an order-preserving value tree
pub fn parse_spec(content: &str, format: SpecFormat) -> Result<Value> {
    match format {
        SpecFormat::Json => serde_json::from_str(content)
            .map_err(|e| SpecError::MalformedSpec(format!("invalid JSON: {}", e))),
        SpecFormat::Yaml => {
            let value: serde_yaml::Value = serde_yaml::from_str(content)
                .map_err(|e| SpecError::MalformedSpec(format!("invalid YAML: {}", e)))?;
            yaml_to_json(value)
        }
    }
}

/// Convert a YAML value into the JSON value model.
///
/// Scalar mapping keys are coerced to strings: YAML parses a response
/// status code like `200:` as an integer key, which has no JSON
/// counterpart. Mapping order is preserved on both sides.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or_default();
                Value::Number(serde_json::Number::from_f64(f).ok_or_else(|| {
                    SpecError::MalformedSpec(format!("non-finite number {} in YAML document", f))
                })?)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect::<Result<_>>()?)
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = serde_json::Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => {
                        return Err(SpecError::MalformedSpec(format!(
                            "unsupported mapping key in YAML document: {:?}",
                            other
                        )))
                    }
                };
                map.insert(key, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}
