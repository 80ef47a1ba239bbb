//! OpenAPI to JSON Schema conversion.
//!
//! Converts an OpenAPI/Swagger description (2.x or 3.x) into one JSON
//! Schema document per named type plus an aggregate index, rewriting
//! cross-type references consistently for the chosen output layout.
//!
//! # Example
//!
//! ```
//! use oas2schema::{convert, ConvertOptions};
//! use serde_json::json;
//!
//! let document = json!({
//!     "openapi": "3.0.2",
//!     "components": { "schemas": {
//!         "Pet": {
//!             "type": "object",
//!             "properties": { "id": { "$ref": "#/components/schemas/ID" } }
//!         },
//!         "ID": { "type": "string" }
//!     }}
//! });
//!
//! let out = tempfile::tempdir().unwrap();
//! let report = convert(&document, &ConvertOptions::new(out.path())).unwrap();
//!
//! assert!(report.is_ok());
//! assert!(out.path().join("Pet.json").exists());
//! assert!(out.path().join("ID.json").exists());
//! assert!(out.path().join("all.json").exists());
//! ```
//!
//! # Reference rewriting
//!
//! Local anchors differ between versions (`#/definitions/X` before 3.0,
//! `#/components/schemas/X` after) and rewrite differently per layout:
//!
//! | version | layout      | rewritten form      |
//! |---------|-------------|---------------------|
//! | pre-3   | multi-file  | `{prefix}#/X.json`  |
//! | pre-3   | single file | `{prefix}#/X`       |
//! | 3.x     | multi-file  | `X.json`            |
//! | 3.x     | single file | `#/X`               |
//!
//! With `stand_alone` set, references are not left as pointers at all:
//! every locally resolvable `$ref` is replaced by the referenced
//! definition's content, with cycle detection.

mod convert;
mod document;
mod emitter;
mod error;
mod loader;
mod names;
mod processor;
mod refs;
mod rules;
mod types;
mod visitor;

pub use convert::{convert, ConvertReport, TypeFailure};
pub use document::{definitions, merge_kubernetes_extensions};
pub use error::ConvertError;
pub use loader::{is_url, load_document, load_document_auto, load_document_str};
pub use names::resolve_name;
pub use processor::{process, SCHEMA_URI};
pub use refs::{closure, collect_references, dereference};
pub use rules::{
    expand_int_or_string, inject_additional_properties, rewrite_ref_target, rewrite_refs,
    widen_optional_types,
};
pub use types::{json_type_name, ConvertOptions, RewriteContext, SpecVersion};
pub use visitor::{transform, Rewrite};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
