//! Typed read-only views over a resolved, normalized document tree
//!
//! The resolver hands the renderer a plain `serde_json::Value`. These
//! wrappers give the renderer a typed surface over the entities it cares
//! about (operations, parameters, responses) without copying the tree.

use crate::{Result, SpecError};
use serde_json::{Map, Value};

/// Location of a request parameter (`in` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    FormData,
}

impl ParameterLocation {
    /// Parse the `in` field. Unknown locations yield `None` and are
    /// skipped by the renderer.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "body" => Some(Self::Body),
            "formData" => Some(Self::FormData),
            _ => None,
        }
    }
}

/// One HTTP method on one endpoint
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    endpoint: &'a str,
    method: &'a str,
    raw: &'a Map<String, Value>,
}

impl<'a> Operation<'a> {
    /// Wrap a method entry from the `paths` mapping.
    ///
    /// Fails with `MalformedSpec` when the entry is not an object.
    pub fn new(endpoint: &'a str, method: &'a str, value: &'a Value) -> Result<Self> {
        let raw = value.as_object().ok_or_else(|| {
            SpecError::MalformedSpec(format!(
                "operation {} {} is not an object",
                method, endpoint
            ))
        })?;
        Ok(Self {
            endpoint,
            method,
            raw,
        })
    }

    pub fn endpoint(&self) -> &'a str {
        self.endpoint
    }

    pub fn method(&self) -> &'a str {
        self.method
    }

    pub fn summary(&self) -> Option<&'a str> {
        self.raw.get("summary").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.raw.get("description").and_then(Value::as_str)
    }

    /// All parameters, in spec order. The normalizer guarantees the key
    /// exists on a normalized tree; an absent key reads as empty here so
    /// the views also work on raw trees.
    pub fn parameters(&self) -> Vec<Parameter<'a>> {
        self.raw
            .get("parameters")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_object)
                    .map(|raw| Parameter { raw })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Parameters with a specific location
    pub fn parameters_in(&self, location: ParameterLocation) -> Vec<Parameter<'a>> {
        self.parameters()
            .into_iter()
            .filter(|p| p.location() == Some(location))
            .collect()
    }

    /// Response entries in status-code order as they appear in the spec.
    ///
    /// Fails with `MalformedSpec` when the operation has no `responses`
    /// mapping.
    pub fn responses(&self) -> Result<Vec<(&'a str, Response<'a>)>> {
        let responses = self
            .raw
            .get("responses")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                SpecError::MalformedSpec(format!(
                    "operation {} {} has no responses",
                    self.method, self.endpoint
                ))
            })?;

        Ok(responses
            .iter()
            .filter_map(|(status, value)| {
                value
                    .as_object()
                    .map(|raw| (status.as_str(), Response { raw }))
            })
            .collect())
    }
}

/// A single request parameter
#[derive(Debug, Clone, Copy)]
pub struct Parameter<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> Parameter<'a> {
    pub fn name(&self) -> &'a str {
        self.raw.get("name").and_then(Value::as_str).unwrap_or("")
    }

    pub fn location(&self) -> Option<ParameterLocation> {
        self.raw
            .get("in")
            .and_then(Value::as_str)
            .and_then(ParameterLocation::parse)
    }

    /// `required` defaults to false when absent
    pub fn required(&self) -> bool {
        self.raw
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn param_type(&self) -> &'a str {
        self.raw.get("type").and_then(Value::as_str).unwrap_or("")
    }

    pub fn description(&self) -> &'a str {
        self.raw
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn schema(&self) -> Option<Schema<'a>> {
        self.raw
            .get("schema")
            .and_then(Value::as_object)
            .map(|raw| Schema { raw })
    }
}

/// One response entry of an operation
#[derive(Debug, Clone, Copy)]
pub struct Response<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> Response<'a> {
    pub fn description(&self) -> &'a str {
        self.raw
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn schema(&self) -> Option<Schema<'a>> {
        self.raw
            .get("schema")
            .and_then(Value::as_object)
            .map(|raw| Schema { raw })
    }

    /// Response headers as (name, description) pairs, in spec order
    pub fn headers(&self) -> Vec<(&'a str, &'a str)> {
        self.raw
            .get("headers")
            .and_then(Value::as_object)
            .map(|headers| {
                headers
                    .iter()
                    .map(|(name, header)| {
                        let description = header
                            .get("description")
                            .and_then(Value::as_str)
                            .unwrap_or("");
                        (name.as_str(), description)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// An object or array schema attached to a body parameter or response
#[derive(Debug, Clone, Copy)]
pub struct Schema<'a> {
    raw: &'a Map<String, Value>,
}

impl<'a> Schema<'a> {
    pub fn example(&self) -> Option<&'a Value> {
        self.raw.get("example")
    }

    /// Object properties in declaration order
    pub fn properties(&self) -> Vec<Property<'a>> {
        self.raw
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .filter_map(|(name, value)| {
                        value.as_object().map(|raw| Property {
                            name: name.as_str(),
                            raw,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One property of an object schema
#[derive(Debug, Clone, Copy)]
pub struct Property<'a> {
    name: &'a str,
    raw: &'a Map<String, Value>,
}

impl<'a> Property<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn prop_type(&self) -> &'a str {
        self.raw.get("type").and_then(Value::as_str).unwrap_or("")
    }

    pub fn description(&self) -> &'a str {
        self.raw
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn minimum(&self) -> Option<i64> {
        self.raw.get("minimum").and_then(Value::as_i64)
    }

    pub fn maximum(&self) -> Option<i64> {
        self.raw.get("maximum").and_then(Value::as_i64)
    }
}
