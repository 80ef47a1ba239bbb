//! Assembly and writing of output documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::error::ConvertError;
use crate::rules::inject_additional_properties;
use crate::types::{ConvertOptions, SpecVersion};

/// Serialize a document and write it to `{output_dir}/{name}.json`.
pub fn write_schema(
    output_dir: &Path,
    name: &str,
    document: &Value,
) -> Result<PathBuf, ConvertError> {
    let path = output_dir.join(format!("{name}.json"));
    let serialized =
        serde_json::to_string_pretty(document).map_err(|source| ConvertError::SerializeError {
            name: name.to_string(),
            source,
        })?;
    fs::write(&path, serialized).map_err(|source| ConvertError::WriteError {
        path: path.clone(),
        source,
    })?;
    debug!("generated {}", path.display());
    Ok(path)
}

/// Write `_definitions.json`: the raw (merged) definitions map wrapped in a
/// `definitions` envelope, so pre-3.0 `{prefix}#/definitions/{name}` refs
/// resolve against one shared file. Strict mode closes every nested schema
/// before writing.
pub fn write_definitions(
    definitions: &Map<String, Value>,
    options: &ConvertOptions,
) -> Result<PathBuf, ConvertError> {
    info!("generating shared definitions");
    let mut all = Value::Object(definitions.clone());
    if options.strict {
        all = inject_additional_properties(&all);
    }
    write_schema(
        &options.output_dir,
        "_definitions",
        &json!({ "definitions": all }),
    )
}

/// Write the `all.json` aggregate index: a `oneOf` enumerating a reference
/// to every emitted type, in the version-appropriate syntax.
pub fn write_index(
    names: &[String],
    options: &ConvertOptions,
    version: SpecVersion,
) -> Result<PathBuf, ConvertError> {
    info!("generating index of all types");
    let references: Vec<Value> = names
        .iter()
        .map(|name| index_reference(name, options, version))
        .collect();
    write_schema(
        &options.output_dir,
        "all",
        &json!({ "oneOf": references }),
    )
}

fn index_reference(name: &str, options: &ConvertOptions, version: SpecVersion) -> Value {
    match version {
        SpecVersion::V2 => json!({
            "$ref": format!("{}#/definitions/{}", options.prefix, name)
        }),
        SpecVersion::V3 => json!({
            "$ref": format!("{}.json", name.replace("#/components/schemas/", ""))
        }),
    }
}
