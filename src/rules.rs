//! Structural rewrite rules applied to schema trees.
//!
//! Each rule is a pure transform: it takes a node, returns a rebuilt node,
//! and never mutates its input. Reference rewriting and the int-or-string
//! expansion are expressed as [`transform`](crate::visitor::transform)
//! rules; the nullable widening needs ancestor context and carries its own
//! recursion.

use serde_json::{json, Map, Value};

use crate::types::{RewriteContext, SpecVersion};
use crate::visitor::{transform, Rewrite};

/// Rewrite every `$ref` string for the output layout.
pub fn rewrite_refs(node: &Value, ctx: &RewriteContext) -> Value {
    transform(node, &mut |key, value| match value {
        Value::String(target) if key == "$ref" => {
            Rewrite::Replace(Value::String(rewrite_ref_target(target, ctx)))
        }
        _ => Rewrite::Keep,
    })
}

/// Rewrite a single reference target.
///
/// The local anchor is stripped and the bare name respelled per version
/// and layout:
///
/// | version | layout      | `#/definitions/ID` / `#/components/schemas/ID` |
/// |---------|-------------|--------------------------------------------------|
/// | pre-3   | multi-file  | `{prefix}#/ID.json`                              |
/// | pre-3   | single file | `{prefix}#/ID`                                   |
/// | 3.x     | multi-file  | `ID.json`                                        |
/// | 3.x     | single file | `#/ID`                                           |
///
/// Targets without the version's local anchor (external URLs, refs already
/// in output form) pass through untouched, which keeps the rule
/// idempotent: the same source path always maps to the same target path.
pub fn rewrite_ref_target(target: &str, ctx: &RewriteContext) -> String {
    let Some(name) = target.strip_prefix(ctx.version.ref_anchor()) else {
        return target.to_string();
    };
    match (ctx.version, ctx.single_file) {
        (SpecVersion::V2, true) => format!("{}#/{}", ctx.prefix, name),
        (SpecVersion::V2, false) => format!("{}#/{}.json", ctx.prefix, name),
        (SpecVersion::V3, true) => format!("#/{}", name),
        (SpecVersion::V3, false) => format!("{}.json", name),
    }
}

/// Set `additionalProperties: false` on every nested object that declares
/// `properties` without an explicit `additionalProperties`.
///
/// This reproduces kubectl's strict validation semantics: unknown fields
/// are rejected at every schema level, not just the root. Objects that
/// already pin `additionalProperties` are left alone, which makes the rule
/// idempotent.
pub fn inject_additional_properties(node: &Value) -> Value {
    transform(node, &mut |_, value| match value {
        Value::Object(map)
            if map.contains_key("properties") && !map.contains_key("additionalProperties") =>
        {
            let mut closed = map.clone();
            closed.insert("additionalProperties".to_string(), Value::Bool(false));
            Rewrite::Amend(Value::Object(closed))
        }
        _ => Rewrite::Keep,
    })
}

/// Replace `format: "int-or-string"` objects with a string/integer union.
///
/// Kubernetes models IntOrString as a custom format; JSON Schema
/// validators need the explicit `oneOf`.
pub fn expand_int_or_string(node: &Value) -> Value {
    transform(node, &mut |_, value| {
        match value.get("format").and_then(Value::as_str) {
            Some("int-or-string") => Rewrite::Replace(json!({
                "oneOf": [{ "type": "string" }, { "type": "integer" }]
            })),
            _ => Rewrite::Keep,
        }
    })
}

/// Widen the `type` of every optional property to `[original, "null"]`.
///
/// A property is optional when its key is absent from the `required` array
/// of the object schema declaring it — the grandparent of the `type`
/// scalar, so the rule threads an ancestor context through the recursion.
/// Takes the full schema node: its own `required` array governs its
/// top-level properties the same way nested ones are governed.
pub fn widen_optional_types(schema: &Value) -> Value {
    let Some(map) = schema.as_object() else {
        return schema.clone();
    };
    let Some(properties) = map.get("properties") else {
        return schema.clone();
    };

    let widened = widen(properties, Some(schema), None, Some("properties"));
    let mut out = map.clone();
    out.insert("properties".to_string(), widened);
    Value::Object(out)
}

fn widen(
    node: &Value,
    parent: Option<&Value>,
    grandparent: Option<&Value>,
    key: Option<&str>,
) -> Value {
    match node {
        Value::Object(map) => {
            let mut out = Map::new();
            for (member_key, value) in map {
                let rebuilt = match value {
                    Value::Object(_) => widen(value, Some(node), parent, Some(member_key.as_str())),
                    Value::Array(items) => Value::Array(
                        items
                            .iter()
                            .map(|item| widen(item, Some(value), parent, Some(member_key.as_str())))
                            .collect(),
                    ),
                    Value::String(ty)
                        if member_key == "type"
                            && ty != "null"
                            && !required_contains(grandparent, key) =>
                    {
                        json!([ty, "null"])
                    }
                    other => other.clone(),
                };
                out.insert(member_key.clone(), rebuilt);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| widen(item, parent, grandparent, key))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

fn required_contains(grandparent: Option<&Value>, key: Option<&str>) -> bool {
    let (Some(grandparent), Some(key)) = (grandparent, key) else {
        return false;
    };
    grandparent
        .get("required")
        .and_then(Value::as_array)
        .map(|required| required.iter().any(|name| name.as_str() == Some(key)))
        .unwrap_or(false)
}
