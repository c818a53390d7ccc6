//! Template context construction
//!
//! Flattens one [`Operation`] view into the serializable shape the
//! operation template consumes: parameters partitioned by location, body
//! schema rows, response rows with pre-rendered example blocks.

use crate::example;
use openapi_rst_common::{Operation, Parameter, ParameterLocation, Result};
use serde::Serialize;

/// Everything the operation template needs for one endpoint/method pair
#[derive(Debug, Serialize)]
pub struct OperationContext {
    pub title: String,
    pub underline: String,
    pub summary: String,
    pub description: String,
    pub path_parameters: Vec<ParamRow>,
    pub query_parameters: Vec<ParamRow>,
    pub header_parameters: Vec<ParamRow>,
    pub bodies: Vec<BodyContext>,
    pub responses: Vec<ResponseRow>,
    pub response_headers: Vec<ResheaderRow>,
}

#[derive(Debug, Serialize)]
pub struct ParamRow {
    pub name: String,
    pub required: bool,
    pub param_type: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct BodyContext {
    pub properties: Vec<BodyPropertyRow>,
    pub example_block: String,
}

#[derive(Debug, Serialize)]
pub struct BodyPropertyRow {
    pub name: String,
    pub prop_type: String,
    pub description: String,
    /// ` Range: (min, max).` for integer properties, empty otherwise
    pub range: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseRow {
    pub status: String,
    pub description: String,
    pub example_block: String,
}

#[derive(Debug, Serialize)]
pub struct ResheaderRow {
    pub name: String,
    pub description_lines: Vec<String>,
}

/// Build the template context for one operation.
///
/// Fails with `MalformedSpec` when the operation has no `responses`.
pub fn operation_context(op: &Operation) -> Result<OperationContext> {
    let title = format!("{} {}", op.method(), op.endpoint());
    let underline = "*".repeat(title.chars().count());

    let param_row = |p: &Parameter| ParamRow {
        name: p.name().to_string(),
        required: p.required(),
        param_type: p.param_type().to_string(),
        description: p.description().to_string(),
    };

    let bodies = op
        .parameters_in(ParameterLocation::Body)
        .iter()
        .map(|p| {
            let properties = p
                .schema()
                .map(|schema| {
                    schema
                        .properties()
                        .iter()
                        .map(|prop| BodyPropertyRow {
                            name: prop.name().to_string(),
                            prop_type: prop.prop_type().to_string(),
                            description: prop.description().to_string(),
                            range: integer_range(prop.prop_type(), prop.minimum(), prop.maximum()),
                        })
                        .collect()
                })
                .unwrap_or_default();

            let example_block = p
                .schema()
                .and_then(|schema| schema.example().map(example::example_block))
                .unwrap_or_default();

            BodyContext {
                properties,
                example_block,
            }
        })
        .collect();

    let mut responses = Vec::new();
    let mut response_headers = Vec::new();
    for (status, response) in op.responses()? {
        let example_block = response
            .schema()
            .and_then(|schema| schema.example().map(example::example_block))
            .unwrap_or_default();
        responses.push(ResponseRow {
            status: status.to_string(),
            description: response.description().to_string(),
            example_block,
        });

        for (name, description) in response.headers() {
            response_headers.push(ResheaderRow {
                name: name.to_string(),
                description_lines: description.lines().map(String::from).collect(),
            });
        }
    }

    Ok(OperationContext {
        title,
        underline,
        summary: op.summary().unwrap_or("").to_string(),
        description: op.description().unwrap_or("").to_string(),
        path_parameters: op
            .parameters_in(ParameterLocation::Path)
            .iter()
            .map(param_row)
            .collect(),
        query_parameters: op
            .parameters_in(ParameterLocation::Query)
            .iter()
            .map(param_row)
            .collect(),
        header_parameters: op
            .parameters_in(ParameterLocation::Header)
            .iter()
            .map(param_row)
            .collect(),
        bodies,
        responses,
        response_headers,
    })
}

/// Value range annotation for integer body properties, `-` standing in
/// for an absent bound
fn integer_range(prop_type: &str, minimum: Option<i64>, maximum: Option<i64>) -> String {
    if prop_type != "integer" {
        return String::new();
    }
    let bound = |b: Option<i64>| b.map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(" Range: ({}, {}).", bound(minimum), bound(maximum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_partitions_parameters() {
        let value = json!({
            "summary": "Create a pet",
            "description": "Adds a pet",
            "parameters": [
                {"name": "id", "in": "path", "required": true, "type": "string"},
                {"name": "limit", "in": "query", "type": "integer"},
                {"name": "X-Trace", "in": "header", "description": "Trace id"},
                {"name": "pet", "in": "body", "schema": {
                    "properties": {
                        "name": {"type": "string", "description": "Pet name"},
                        "age": {"type": "integer", "minimum": 0, "maximum": 100}
                    },
                    "example": {"name": "doggie"}
                }}
            ],
            "responses": {
                "201": {"description": "Created", "headers": {
                    "X-RateLimit": {"description": "Remaining requests"}
                }}
            }
        });

        let op = Operation::new("/pets", "post", &value).unwrap();
        let ctx = operation_context(&op).unwrap();

        assert_eq!(ctx.title, "post /pets");
        assert_eq!(ctx.underline.len(), ctx.title.len());
        assert_eq!(ctx.path_parameters.len(), 1);
        assert!(ctx.path_parameters[0].required);
        assert_eq!(ctx.query_parameters.len(), 1);
        assert_eq!(ctx.header_parameters.len(), 1);
        assert_eq!(ctx.bodies.len(), 1);
        assert_eq!(ctx.bodies[0].properties[1].range, " Range: (0, 100).");
        assert!(ctx.bodies[0].example_block.contains("doggie"));
        assert_eq!(ctx.responses[0].status, "201");
        assert_eq!(ctx.response_headers[0].name, "X-RateLimit");
    }

    #[test]
    fn test_range_only_for_integers() {
        assert_eq!(integer_range("string", Some(0), Some(1)), "");
        assert_eq!(integer_range("integer", None, Some(10)), " Range: (-, 10).");
    }
}
