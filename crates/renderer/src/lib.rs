//! httpdomain markup rendering for openapi-rst
//!
//! The pipeline entry point of the workspace: takes a parsed OpenAPI
//! document tree, resolves its JSON references, normalizes shared
//! parameters and renders one reStructuredText section per operation.
//!
//! ```rust,ignore
//! let tree = openapi_rst_resolver::load_spec("petstore.yaml")?;
//! let markup = openapi_rst_renderer::render(tree, &RenderOptions::default())?;
//! for line in markup.lines() {
//!     println!("{}", line);
//! }
//! ```

mod context;
mod example;
mod templates;

pub use example::example_block;

use openapi_rst_common::{Operation, Result, SpecError};
use openapi_rst_resolver::{normalize, RefResolver};
use serde_json::Value;
use tera::Tera;

/// Options recognized by the pipeline entry point
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Base URI anchoring relative reference resolution; empty for
    /// in-memory documents
    pub uri: String,

    /// Endpoint paths to restrict output to; `None` renders every
    /// endpoint in spec order
    pub paths: Option<Vec<String>>,
}

/// Rendered markup, consumable line by line
#[derive(Debug, Clone)]
pub struct Markup {
    lines: Vec<String>,
}

impl Markup {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Renders operations of a resolved, normalized tree
///
/// Most callers want [`render`], which drives the whole pipeline; this
/// type is the template-owning piece of it.
pub struct HttpDomainRenderer {
    tera: Tera,
}

impl HttpDomainRenderer {
    pub fn new() -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self { tera })
    }

    /// Render one operation as a markup section
    pub fn render_operation(&self, operation: &Operation) -> Result<String> {
        let context = context::operation_context(operation)?;
        let context = tera::Context::from_serialize(&context)
            .map_err(|e| SpecError::Template(format!("context error: {}", e)))?;

        self.tera
            .render("operation.rst", &context)
            .map_err(|e| SpecError::Template(format!("operation template error: {}", e)))
    }
}

/// Validate the requested endpoint paths against the spec.
///
/// Returns the paths to render: the requested ones in request order, or
/// every endpoint in spec order when no explicit list is given. Fails
/// with `UnknownPaths` listing every requested path the spec does not
/// define, and with `MalformedSpec` when the spec has no `paths` object.
pub fn select_endpoints(tree: &Value, requested: Option<&[String]>) -> Result<Vec<String>> {
    let paths = tree
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| SpecError::MalformedSpec("spec has no paths object".to_string()))?;

    match requested {
        Some(requested) => {
            let missing: Vec<String> = requested
                .iter()
                .filter(|path| !paths.contains_key(path.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(SpecError::UnknownPaths(missing));
            }
            Ok(requested.to_vec())
        }
        None => Ok(paths.keys().cloned().collect()),
    }
}

/// Run the full pipeline: resolve references, normalize shared
/// parameters, filter endpoints and render markup.
///
/// Consumes the tree; resolution rebuilds it and nothing else may hold
/// onto the pre-resolution value.
pub fn render(tree: Value, options: &RenderOptions) -> Result<Markup> {
    let resolver = RefResolver::new(&options.uri)?;
    let mut tree = resolver.resolve(tree)?;
    normalize(&mut tree);

    let endpoints = select_endpoints(&tree, options.paths.as_deref())?;
    log::debug!("rendering {} endpoints", endpoints.len());

    let renderer = HttpDomainRenderer::new()?;
    let paths = tree
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| SpecError::MalformedSpec("spec has no paths object".to_string()))?;

    let mut lines = Vec::new();
    for endpoint in &endpoints {
        let methods = match paths.get(endpoint).and_then(Value::as_object) {
            Some(methods) => methods,
            None => continue,
        };

        for (method, value) in methods {
            let operation = Operation::new(endpoint, method, value)?;
            let section = renderer.render_operation(&operation)?;
            lines.extend(section.lines().map(String::from));
            lines.push(String::new());
            lines.push(String::new());
        }
    }

    Ok(Markup { lines })
}
