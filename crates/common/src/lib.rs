//! Common types and utilities for openapi-rst
//!
//! This crate contains the shared error taxonomy and the typed read-only
//! views over a resolved, normalized OpenAPI document tree that the
//! renderer consumes.

mod views;

pub use views::{Operation, Parameter, ParameterLocation, Property, Response, Schema};

use thiserror::Error;

/// Errors that can occur while resolving or rendering a spec
#[derive(Error, Debug)]
pub enum SpecError {
    /// A `$ref` target does not exist or an external document could not
    /// be fetched or parsed. The message names the offending URI.
    #[error("cannot resolve reference: {0}")]
    ReferenceResolution(String),

    /// The reference graph is cyclic. The message names the reference
    /// that closed the cycle.
    #[error("circular reference detected at {0}")]
    Cycle(String),

    /// The caller requested endpoint paths that the spec does not define.
    #[error("one or more paths are not defined in the spec: {}", .0.join(", "))]
    UnknownPaths(Vec<String>),

    /// The spec is missing a required key such as `paths` or an
    /// operation's `responses`.
    #[error("malformed spec: {0}")]
    MalformedSpec(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for openapi-rst operations
pub type Result<T> = std::result::Result<T, SpecError>;
