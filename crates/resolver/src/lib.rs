//! Spec loading and JSON reference resolution
//!
//! This crate turns an on-disk or in-memory OpenAPI document into a fully
//! dereferenced, normalized tree:
//!
//! - [`load_spec`] reads a JSON or YAML file into an order-preserving
//!   value tree
//! - [`RefResolver`] replaces every `$ref` node with the object it points
//!   to, fetching and caching external documents as needed
//! - [`normalize`] hoists endpoint-level parameters into each operation
//!
//! The resolver consumes the tree and returns the transformed tree;
//! callers must rebind to the returned value.

mod fetch;
mod loader;
mod normalizer;
mod pointer;
mod resolver;

pub use fetch::{DocumentFetcher, StdFetcher};
pub use loader::{detect_format, load_spec, parse_spec, sniff_format, SpecFormat};
pub use normalizer::normalize;
pub use resolver::{resolve_refs, RefResolver};
