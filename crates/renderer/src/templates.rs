//! Template loading and management

use openapi_rst_common::{Result, SpecError};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    // Register custom filters
    tera.register_filter("required_marker", required_marker_filter);
    tera.register_filter("collapse", collapse_filter);

    tera.add_raw_template(
        "operation.rst",
        include_str!("../templates/operation.rst.tera"),
    )
    .map_err(|e| SpecError::Template(format!("failed to load operation template: {}", e)))?;

    Ok(tera)
}

/// Filter marking required parameters: true renders as ```` ``*`` ````,
/// false as an empty string, so required and optional parameters are
/// distinguishable in the output
fn required_marker_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let required = value.as_bool().unwrap_or(false);
    let marker = if required { "``*``" } else { "" };
    Ok(Value::String(marker.to_string()))
}

/// Filter collapsing a multi-line description into a single line
fn collapse_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("collapse filter expects a string"))?;
    Ok(Value::String(s.lines().collect::<String>()))
}
