//! The per-type transformation pipeline.

use serde_json::{Map, Value};

use crate::error::ConvertError;
use crate::refs::dereference;
use crate::rules::{
    expand_int_or_string, inject_additional_properties, rewrite_refs, widen_optional_types,
};
use crate::types::{json_type_name, ConvertOptions, RewriteContext};

/// `$schema` marker attached to emitted documents.
pub const SCHEMA_URI: &str = "http://json-schema.org/schema#";

/// Run the full transformation pipeline for one named type.
///
/// The steps form a strict sequence: defaults and strict/deprecation
/// handling first, then reference rewriting, which must precede
/// stand-alone dereferencing (the dereferencer parses the rewritten
/// forms), and the Kubernetes property rules last. The definition is
/// cloned up front; definitions may share subtrees between types and the
/// source map is never written to.
///
/// # Errors
///
/// `NotFound` when the type has no definition, `UnsupportedType` for
/// deprecated Kubernetes internal types, `CyclicReference` when
/// stand-alone dereferencing hits a reference cycle.
pub fn process(
    type_name: &str,
    definitions: &Map<String, Value>,
    options: &ConvertOptions,
    ctx: &RewriteContext,
) -> Result<Value, ConvertError> {
    let definition = definitions
        .get(type_name)
        .ok_or_else(|| ConvertError::NotFound {
            name: type_name.to_string(),
        })?;

    let mut spec = match definition {
        Value::Object(map) => map.clone(),
        other => {
            return Err(ConvertError::MalformedDocument {
                reason: format!(
                    "definition of {} is {}, expected object",
                    type_name,
                    json_type_name(other)
                ),
            })
        }
    };

    if !ctx.single_file {
        spec.insert("$schema".to_string(), Value::String(SCHEMA_URI.to_string()));
    }

    spec.entry("type")
        .or_insert_with(|| Value::String("object".to_string()));

    if options.strict {
        spec.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    if options.kubernetes && is_deprecated_internal(type_name) {
        return Err(ConvertError::UnsupportedType {
            name: type_name.to_string(),
            reason: "deprecated internal pkg namespace".into(),
        });
    }

    let mut spec = rewrite_refs(&Value::Object(spec), ctx);

    if options.stand_alone {
        spec = dereference(&spec, definitions, ctx)?;
    }

    if let Some(map) = spec.as_object_mut() {
        // additionalProperties may itself be a schema fragment carrying refs
        if let Some(additional) = map
            .get("additionalProperties")
            .filter(|value| value.is_object())
            .cloned()
        {
            map.insert(
                "additionalProperties".to_string(),
                rewrite_refs(&additional, ctx),
            );
        }

        if options.strict {
            if let Some(properties) = map.get("properties").cloned() {
                map.insert(
                    "properties".to_string(),
                    inject_additional_properties(&properties),
                );
            }
        }

        if options.kubernetes {
            if let Some(properties) = map.get("properties").cloned() {
                map.insert("properties".to_string(), expand_int_or_string(&properties));
            }
        }
    }

    if options.kubernetes && spec.get("properties").is_some() {
        spec = widen_optional_types(&spec);
    }

    Ok(spec)
}

/// Types under the legacy `io.k8s.kubernetes.pkg` namespace are deprecated
/// aliases of their apimachinery/api counterparts.
fn is_deprecated_internal(type_name: &str) -> bool {
    let segments: Vec<&str> = type_name.split('.').collect();
    segments.get(2) == Some(&"kubernetes") && segments.get(3) == Some(&"pkg")
}
