//! Access to the parsed source document and Kubernetes extension merging.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::ConvertError;
use crate::types::{json_type_name, SpecVersion};

const INT_OR_STRING: &str = "io.k8s.apimachinery.pkg.util.intstr.IntOrString";
const QUANTITY: &str = "io.k8s.apimachinery.pkg.api.resource.Quantity";
const GROUP_VERSION_KIND: &str = "x-kubernetes-group-version-kind";

/// Extract the type definitions map for the detected version.
///
/// Pre-3.0 documents keep definitions under `definitions`; 3.x keeps them
/// under `components.schemas`.
///
/// # Errors
///
/// Returns `MalformedDocument` when the section is missing or not an
/// object.
pub fn definitions(
    document: &Value,
    version: SpecVersion,
) -> Result<Map<String, Value>, ConvertError> {
    let section = match version {
        SpecVersion::V2 => document.get("definitions"),
        SpecVersion::V3 => document
            .get("components")
            .and_then(|components| components.get("schemas")),
    };

    match section {
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(other) => Err(ConvertError::MalformedDocument {
            reason: format!(
                "type definitions section is {}, expected object",
                json_type_name(other)
            ),
        }),
        None => Err(ConvertError::MalformedDocument {
            reason: match version {
                SpecVersion::V2 => "missing definitions section".into(),
                SpecVersion::V3 => "missing components.schemas section".into(),
            },
        }),
    }
}

/// Merge Kubernetes extension semantics into a pre-3.0 definitions map.
///
/// Runs once, before any per-type processing:
///
/// - injects the fixed `IntOrString` and `Quantity` definitions. The API
///   models Quantity as a string, but the surrounding tooling accepts
///   plain numbers, so the union admits both.
/// - for every definition declaring `x-kubernetes-group-version-kind`,
///   appends the declared kind to the `kind` property's `enum` and, when
///   `expanded` is set, appends `{group}/{version}` (bare version for the
///   empty group) to the `apiVersion` property's `enum`. No duplicates.
pub fn merge_kubernetes_extensions(definitions: &mut Map<String, Value>, expanded: bool) {
    debug!("merging Kubernetes extension definitions");

    definitions.insert(
        INT_OR_STRING.to_string(),
        json!({ "oneOf": [{ "type": "string" }, { "type": "integer" }] }),
    );
    definitions.insert(
        QUANTITY.to_string(),
        json!({ "oneOf": [{ "type": "string" }, { "type": "number" }] }),
    );

    for definition in definitions.values_mut() {
        let Some(declared) = definition.get(GROUP_VERSION_KIND).cloned() else {
            continue;
        };
        let Some(entries) = declared.as_array() else {
            continue;
        };

        for entry in entries {
            let group = entry.get("group").and_then(Value::as_str).unwrap_or("");
            let version = entry.get("version").and_then(Value::as_str).unwrap_or("");
            let kind = entry.get("kind").and_then(Value::as_str).unwrap_or("");

            if expanded && !version.is_empty() {
                let api_version = if group.is_empty() {
                    version.to_string()
                } else {
                    format!("{group}/{version}")
                };
                if let Some(property) = property_mut(definition, "apiVersion") {
                    append_no_duplicates(property, "enum", Value::String(api_version));
                }
            }

            if !kind.is_empty() {
                if let Some(property) = property_mut(definition, "kind") {
                    append_no_duplicates(property, "enum", Value::String(kind.to_string()));
                }
            }
        }
    }
}

fn property_mut<'a>(definition: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    definition.get_mut("properties")?.get_mut(name)
}

/// Append `value` to the array at `key`, creating the array if missing and
/// skipping values already present.
fn append_no_duplicates(node: &mut Value, key: &str, value: Value) {
    let Some(map) = node.as_object_mut() else {
        return;
    };
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(items) = entry.as_array_mut() {
        if !items.contains(&value) {
            items.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_v2() {
        let doc = json!({
            "swagger": "2.0",
            "definitions": { "Pet": { "type": "object" } }
        });
        let defs = definitions(&doc, SpecVersion::V2).unwrap();
        assert!(defs.contains_key("Pet"));
    }

    #[test]
    fn definitions_v3() {
        let doc = json!({
            "openapi": "3.0.2",
            "components": { "schemas": { "Pet": { "type": "object" } } }
        });
        let defs = definitions(&doc, SpecVersion::V3).unwrap();
        assert!(defs.contains_key("Pet"));
    }

    #[test]
    fn definitions_missing_section() {
        let doc = json!({ "openapi": "3.0.2" });
        assert!(matches!(
            definitions(&doc, SpecVersion::V3),
            Err(ConvertError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn definitions_wrong_shape() {
        let doc = json!({ "swagger": "2.0", "definitions": [1, 2] });
        assert!(matches!(
            definitions(&doc, SpecVersion::V2),
            Err(ConvertError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn merge_injects_fixed_definitions() {
        let mut defs = Map::new();
        merge_kubernetes_extensions(&mut defs, false);
        assert_eq!(
            defs[INT_OR_STRING],
            json!({ "oneOf": [{ "type": "string" }, { "type": "integer" }] })
        );
        assert_eq!(
            defs[QUANTITY],
            json!({ "oneOf": [{ "type": "string" }, { "type": "number" }] })
        );
    }

    #[test]
    fn merge_populates_kind_enum() {
        let mut defs = json!({
            "io.k8s.api.apps.v1.Deployment": {
                "x-kubernetes-group-version-kind": [
                    { "group": "apps", "version": "v1", "kind": "Deployment" }
                ],
                "properties": {
                    "kind": { "type": "string" },
                    "apiVersion": { "type": "string" }
                }
            }
        })
        .as_object()
        .cloned()
        .unwrap();

        merge_kubernetes_extensions(&mut defs, false);
        let deployment = &defs["io.k8s.api.apps.v1.Deployment"];
        assert_eq!(
            deployment["properties"]["kind"]["enum"],
            json!(["Deployment"])
        );
        // apiVersion only populated in expanded mode
        assert!(deployment["properties"]["apiVersion"].get("enum").is_none());
    }

    #[test]
    fn merge_expanded_populates_api_version() {
        let mut defs = json!({
            "io.k8s.api.apps.v1.Deployment": {
                "x-kubernetes-group-version-kind": [
                    { "group": "apps", "version": "v1", "kind": "Deployment" }
                ],
                "properties": { "apiVersion": {}, "kind": {} }
            },
            "io.k8s.api.core.v1.Pod": {
                "x-kubernetes-group-version-kind": [
                    { "group": "", "version": "v1", "kind": "Pod" }
                ],
                "properties": { "apiVersion": {}, "kind": {} }
            }
        })
        .as_object()
        .cloned()
        .unwrap();

        merge_kubernetes_extensions(&mut defs, true);
        assert_eq!(
            defs["io.k8s.api.apps.v1.Deployment"]["properties"]["apiVersion"]["enum"],
            json!(["apps/v1"])
        );
        // Empty group uses the bare version
        assert_eq!(
            defs["io.k8s.api.core.v1.Pod"]["properties"]["apiVersion"]["enum"],
            json!(["v1"])
        );
    }

    #[test]
    fn merge_skips_duplicate_enum_values() {
        let mut defs = json!({
            "io.k8s.api.core.v1.Pod": {
                "x-kubernetes-group-version-kind": [
                    { "group": "", "version": "v1", "kind": "Pod" },
                    { "group": "", "version": "v1", "kind": "Pod" }
                ],
                "properties": { "kind": {} }
            }
        })
        .as_object()
        .cloned()
        .unwrap();

        merge_kubernetes_extensions(&mut defs, false);
        assert_eq!(
            defs["io.k8s.api.core.v1.Pod"]["properties"]["kind"]["enum"],
            json!(["Pod"])
        );
    }

    #[test]
    fn merge_tolerates_missing_properties() {
        let mut defs = json!({
            "io.k8s.api.core.v1.Status": {
                "x-kubernetes-group-version-kind": [
                    { "group": "", "version": "v1", "kind": "Status" }
                ]
            }
        })
        .as_object()
        .cloned()
        .unwrap();

        merge_kubernetes_extensions(&mut defs, true);
        assert!(defs["io.k8s.api.core.v1.Status"].get("properties").is_none());
    }
}
