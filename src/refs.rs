//! Reference collection, dependency closure, and stand-alone dereferencing.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ConvertError;
use crate::rules::rewrite_refs;
use crate::types::{RewriteContext, SpecVersion};

/// Collect every `$ref` target in a tree, normalized to bare type names.
///
/// Targets are stripped of the version-specific local anchor
/// (`#/definitions/` or `#/components/schemas/`); anything else is kept
/// verbatim. First-seen order, no duplicates.
pub fn collect_references(node: &Value, version: SpecVersion) -> Vec<String> {
    let mut found = Vec::new();
    collect_into(node, version, &mut found);
    found
}

fn collect_into(node: &Value, version: SpecVersion, found: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::String(target) if key == "$ref" => {
                        let name = target.replace(version.ref_anchor(), "");
                        if !found.contains(&name) {
                            found.push(name);
                        }
                    }
                    _ => collect_into(value, version, found),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, version, found);
            }
        }
        _ => {}
    }
}

/// Transitive closure of type names reachable from `seed` via `$ref` edges.
///
/// Depth-first over the reference graph with a visited check before every
/// recursion, so cyclic graphs terminate. The seed names are included, in
/// the given order, followed by discoveries in first-seen order. Names with
/// no definition in the document are kept in the closure but not expanded.
pub fn closure(
    seed: &[String],
    definitions: &Map<String, Value>,
    version: SpecVersion,
) -> Vec<String> {
    let mut visited: Vec<String> = seed.to_vec();
    for name in seed {
        visit(name, definitions, version, &mut visited);
    }
    visited
}

fn visit(
    name: &str,
    definitions: &Map<String, Value>,
    version: SpecVersion,
    visited: &mut Vec<String>,
) {
    let Some(definition) = definitions.get(name) else {
        debug!("no definition for referenced type {}, not expanding", name);
        return;
    };
    for reference in collect_references(definition, version) {
        if !visited.contains(&reference) {
            visited.push(reference.clone());
            visit(&reference, definitions, version, visited);
        }
    }
}

/// Replace every locally resolvable `$ref` with the referenced definition.
///
/// Runs after reference rewriting, so targets are parsed back from their
/// rewritten forms. Each inlined definition is itself rewritten and
/// dereferenced. References that do not name a local definition are left
/// in place.
///
/// # Errors
///
/// Returns `CyclicReference` when inlining would recurse through a type
/// already on the current path.
pub fn dereference(
    node: &Value,
    definitions: &Map<String, Value>,
    ctx: &RewriteContext,
) -> Result<Value, ConvertError> {
    let mut path = Vec::new();
    deref_value(node, definitions, ctx, &mut path)
}

fn deref_value(
    node: &Value,
    definitions: &Map<String, Value>,
    ctx: &RewriteContext,
    path: &mut Vec<String>,
) -> Result<Value, ConvertError> {
    match node {
        Value::Object(map) => {
            if let Some(target) = map.get("$ref").and_then(Value::as_str) {
                if let Some(name) = local_ref_name(target, ctx) {
                    if let Some(definition) = definitions.get(&name) {
                        if path.iter().any(|seen| *seen == name) {
                            path.push(name);
                            return Err(ConvertError::CyclicReference {
                                path: path.join(" -> "),
                            });
                        }
                        path.push(name.clone());
                        let rewritten = rewrite_refs(definition, ctx);
                        let inlined = deref_value(&rewritten, definitions, ctx, path)?;
                        path.pop();
                        return Ok(inlined);
                    }
                    warn!("cannot dereference {}: no local definition", target);
                } else {
                    warn!("leaving non-local reference {} in place", target);
                }
            }

            let mut out = Map::new();
            for (key, value) in map {
                out.insert(key.clone(), deref_value(value, definitions, ctx, path)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| deref_value(item, definitions, ctx, path))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        scalar => Ok(scalar.clone()),
    }
}

/// Parse a rewritten reference back to the bare type name it points at.
///
/// Handles all four rewritten forms (`{prefix}#/Name.json`, `Name.json`,
/// `{prefix}#/Name`, `#/Name`). Returns `None` for targets that cannot
/// address a type in this document, such as URLs or paths.
fn local_ref_name(target: &str, ctx: &RewriteContext) -> Option<String> {
    let rest = target.strip_prefix(ctx.prefix).unwrap_or(target);
    let rest = rest.strip_prefix("#/").unwrap_or(rest);
    let rest = rest.strip_suffix(".json").unwrap_or(rest);
    if rest.is_empty() || rest.contains('/') || rest.contains('#') {
        return None;
    }
    Some(rest.to_string())
}
