//! Conversion runs: version detection, Kubernetes extension merging,
//! per-type processing, and emission.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::document::{definitions, merge_kubernetes_extensions};
use crate::emitter::{write_definitions, write_index, write_schema};
use crate::error::ConvertError;
use crate::names::resolve_name;
use crate::processor::{process, SCHEMA_URI};
use crate::refs::closure;
use crate::types::{ConvertOptions, RewriteContext, SpecVersion};

/// Outcome of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    /// Files written, in emission order.
    pub written: Vec<PathBuf>,
    /// Types that failed to convert in batch mode.
    pub failures: Vec<TypeFailure>,
}

/// One failed type in a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct TypeFailure {
    /// Output name of the failed type (the raw type name when name
    /// resolution itself failed).
    pub name: String,
    /// Why processing failed.
    pub message: String,
}

impl ConvertReport {
    /// True when every selected type was emitted.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Convert a parsed OpenAPI document into JSON Schema files.
///
/// In single-named mode (`options.name` set) any error aborts the run. In
/// batch mode a failing type is logged and skipped, the remaining types
/// are still emitted, and the aggregate index covers only the successes.
///
/// # Errors
///
/// `MalformedDocument` when the version key or definitions section is
/// missing, `WriteError` when the output directory or a shared file cannot
/// be written, plus any processing error in single-named mode.
pub fn convert(document: &Value, options: &ConvertOptions) -> Result<ConvertReport, ConvertError> {
    let version = SpecVersion::detect(document)?;
    let mut defs = definitions(document, version)?;

    fs::create_dir_all(&options.output_dir).map_err(|source| ConvertError::WriteError {
        path: options.output_dir.clone(),
        source,
    })?;

    if version == SpecVersion::V2 && options.kubernetes {
        merge_kubernetes_extensions(&mut defs, options.expanded);
    }

    match &options.name {
        Some(name) => {
            let path = convert_named(name, &defs, options, version)?;
            Ok(ConvertReport {
                written: vec![path],
                failures: Vec::new(),
            })
        }
        None => convert_all(&defs, options, version),
    }
}

/// Emit one self-contained document for the named type.
///
/// References stay local anchors (`#/Name`); with `include_references`
/// every transitively referenced type is processed and embedded as a
/// root-level member, so those anchors resolve within the one file. The
/// main type is processed before the references are attached, keeping
/// each embedded definition rewritten exactly once.
fn convert_named(
    name: &str,
    defs: &Map<String, Value>,
    options: &ConvertOptions,
    version: SpecVersion,
) -> Result<PathBuf, ConvertError> {
    let ctx = RewriteContext {
        prefix: &options.prefix,
        version,
        single_file: true,
    };

    let mut spec = process(name, defs, options, &ctx)?;

    if options.include_references {
        let seed = vec![name.to_string()];
        for reference in closure(&seed, defs, version) {
            if reference == name {
                continue;
            }
            if !defs.contains_key(&reference) {
                debug!("skipping undefined reference {}", reference);
                continue;
            }
            let processed = process(&reference, defs, options, &ctx)?;
            if let Some(map) = spec.as_object_mut() {
                map.insert(reference, processed);
            }
        }
    }

    if let Some(map) = spec.as_object_mut() {
        map.insert("$schema".to_string(), Value::String(SCHEMA_URI.to_string()));
    }

    let full_name = resolve_name(name, options)?;
    write_schema(&options.output_dir, &full_name, &spec)
}

/// Emit one document per type, the shared pre-3.0 definitions file, and
/// the aggregate index.
fn convert_all(
    defs: &Map<String, Value>,
    options: &ConvertOptions,
    version: SpecVersion,
) -> Result<ConvertReport, ConvertError> {
    info!("generating individual schemas");
    let ctx = RewriteContext {
        prefix: &options.prefix,
        version,
        single_file: false,
    };

    let mut written = Vec::new();
    let mut failures = Vec::new();
    let mut indexed = Vec::new();

    if version == SpecVersion::V2 {
        written.push(write_definitions(defs, options)?);
    }

    for title in defs.keys() {
        match emit_type(title, defs, options, &ctx) {
            Ok(path) => {
                written.push(path);
                indexed.push(title.clone());
            }
            Err(err) => {
                let shown = resolve_name(title, options).unwrap_or_else(|_| title.clone());
                error!("failed to process {}: {}", shown, err);
                failures.push(TypeFailure {
                    name: shown,
                    message: err.to_string(),
                });
            }
        }
    }

    written.push(write_index(&indexed, options, version)?);

    Ok(ConvertReport { written, failures })
}

fn emit_type(
    title: &str,
    defs: &Map<String, Value>,
    options: &ConvertOptions,
    ctx: &RewriteContext,
) -> Result<PathBuf, ConvertError> {
    let full_name = resolve_name(title, options)?;
    debug!("processing {}", full_name);
    let spec = process(title, defs, options, ctx)?;
    write_schema(&options.output_dir, &full_name, &spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ok_without_failures() {
        let report = ConvertReport {
            written: vec![PathBuf::from("out/Pet.json")],
            failures: Vec::new(),
        };
        assert!(report.is_ok());
    }

    #[test]
    fn report_not_ok_with_failures() {
        let report = ConvertReport {
            written: Vec::new(),
            failures: vec![TypeFailure {
                name: "Pod".into(),
                message: "deprecated".into(),
            }],
        };
        assert!(!report.is_ok());
    }
}
