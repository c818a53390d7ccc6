//! Literal-block rendering of schema example payloads
//!
//! Examples attached to body and response schemas are printed as an
//! indented reStructuredText literal block, three spaces per nesting
//! level, one line per entry.

use serde_json::{Map, Value};

const INDENT: &str = "   ";

/// Render an example payload as the body of a literal block, lines
/// joined with `\n`. Returns an empty string for absent or empty
/// examples so templates can skip the whole section.
pub fn example_block(example: &Value) -> String {
    let mut lines = Vec::new();
    match example {
        Value::Object(map) if !map.is_empty() => push_object(map, 1, &mut lines),
        Value::Array(items) if !items.is_empty() => push_list(items, 1, &mut lines),
        Value::Null | Value::Object(_) | Value::Array(_) => {}
        scalar => lines.push(format!("{}{}", INDENT, literal(scalar))),
    }
    lines.join("\n")
}

fn push_object(map: &Map<String, Value>, level: usize, out: &mut Vec<String>) {
    out.push(format!("{}{{", INDENT.repeat(level)));

    for (key, value) in map {
        match value {
            Value::Object(nested) => {
                out.push(format!("{}{}: ", INDENT.repeat(level + 1), key));
                push_object(nested, level + 1, out);
            }
            Value::Array(nested) => {
                out.push(format!("{}{}: ", INDENT.repeat(level + 1), key));
                push_list(nested, level + 1, out);
            }
            scalar => out.push(format!(
                "{}{}: {},",
                INDENT.repeat(level + 1),
                key,
                literal(scalar)
            )),
        }
    }

    let close = if level == 1 { "}" } else { "}," };
    out.push(format!("{}{}", INDENT.repeat(level), close));
}

fn push_list(items: &[Value], level: usize, out: &mut Vec<String>) {
    out.push(format!("{}[", INDENT.repeat(level)));

    for value in items {
        match value {
            Value::Object(nested) => push_object(nested, level + 1, out),
            Value::Array(nested) => push_list(nested, level + 1, out),
            scalar => out.push(format!("{}{},", INDENT.repeat(level + 1), literal(scalar))),
        }
    }

    let close = if level == 1 { "]" } else { "]," };
    out.push(format!("{}{}", INDENT.repeat(level), close));
}

/// Scalars in examples: strings quoted, everything else as JSON
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_object() {
        let block = example_block(&json!({"name": "doggie", "id": 1}));
        assert_eq!(block, "   {\n      name: \"doggie\",\n      id: 1,\n   }");
    }

    #[test]
    fn test_nested_object_and_list() {
        let block = example_block(&json!({
            "pet": {"name": "doggie"},
            "tags": ["a", "b"]
        }));
        // nested keys carry a trailing space before the opening brace line
        let expected = "   {\n      pet: \n      {\n         name: \"doggie\",\n      },\n      tags: \n      [\n         \"a\",\n         \"b\",\n      ],\n   }";
        assert_eq!(block, expected);
    }

    #[test]
    fn test_list_of_objects() {
        let block = example_block(&json!([{"id": 1}]));
        assert_eq!(block, "   [\n      {\n         id: 1,\n      },\n   ]");
    }

    #[test]
    fn test_empty_examples_render_nothing() {
        assert_eq!(example_block(&json!({})), "");
        assert_eq!(example_block(&json!([])), "");
        assert_eq!(example_block(&Value::Null), "");
    }
}
