//! Generic traversal over untyped schema trees.
//!
//! Every structural rewrite rule is built on [`transform`]: a functional
//! rebuild of a [`serde_json::Value`] tree that applies a per-member rule to
//! objects and recurses into containers. Inputs are never mutated, so two
//! types sharing a subtree can be processed independently.

use serde_json::{Map, Value};

/// Outcome of applying a rule to one object member.
pub enum Rewrite {
    /// Keep the value and recurse into it if it is a container.
    Keep,
    /// Substitute the value verbatim; the replacement is not revisited.
    Replace(Value),
    /// Substitute the value, then recurse into the replacement.
    Amend(Value),
}

/// Rebuild a tree, applying `rule` to every key/value pair of every object.
///
/// Object key order and array element order are preserved. Array elements
/// are not key/value pairs, so the rule only fires inside nested objects.
/// Scalars are returned verbatim: a non-container leaf reaching the
/// traversal is a typed base case, not an error.
pub fn transform<F>(node: &Value, rule: &mut F) -> Value
where
    F: FnMut(&str, &Value) -> Rewrite,
{
    match node {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                let rebuilt = match rule(key.as_str(), value) {
                    Rewrite::Keep => transform(value, rule),
                    Rewrite::Replace(replacement) => replacement,
                    Rewrite::Amend(amended) => transform(&amended, rule),
                };
                out.insert(key.clone(), rebuilt);
            }
            Value::Object(out)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| transform(item, rule)).collect())
        }
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keep_preserves_shape_and_order() {
        let node = json!({
            "b": { "nested": [1, 2, 3] },
            "a": "text",
            "c": null
        });
        let out = transform(&node, &mut |_, _| Rewrite::Keep);
        assert_eq!(out, node);
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn scalar_root_is_base_case() {
        let node = json!("leaf");
        assert_eq!(transform(&node, &mut |_, _| Rewrite::Keep), node);
    }

    #[test]
    fn replace_does_not_revisit() {
        let node = json!({ "target": { "target": 1 } });
        let mut fired = 0;
        let out = transform(&node, &mut |key, _| {
            if key == "target" {
                fired += 1;
                Rewrite::Replace(json!({ "target": "done" }))
            } else {
                Rewrite::Keep
            }
        });
        // Only the outer member fires; the replacement is taken verbatim.
        assert_eq!(fired, 1);
        assert_eq!(out, json!({ "target": { "target": "done" } }));
    }

    #[test]
    fn amend_recurses_into_replacement() {
        let node = json!({ "outer": { "flag": false } });
        let out = transform(&node, &mut |key, value| match (key, value) {
            ("outer", Value::Object(map)) if !map.contains_key("seen") => {
                let mut amended = map.clone();
                amended.insert("seen".into(), json!(true));
                Rewrite::Amend(Value::Object(amended))
            }
            ("flag", _) => Rewrite::Replace(json!(true)),
            _ => Rewrite::Keep,
        });
        assert_eq!(out, json!({ "outer": { "flag": true, "seen": true } }));
    }

    #[test]
    fn rule_fires_inside_arrays() {
        let node = json!({ "oneOf": [{ "hit": 0 }, { "miss": 0 }] });
        let out = transform(&node, &mut |key, _| {
            if key == "hit" {
                Rewrite::Replace(json!(1))
            } else {
                Rewrite::Keep
            }
        });
        assert_eq!(out, json!({ "oneOf": [{ "hit": 1 }, { "miss": 0 }] }));
    }
}
