//! Recursive JSON merge used to apply per-call overrides onto a request descriptor.
//!
//! Rules:
//! - object onto object merges key by key, recursively
//! - any other override value replaces the target (arrays replace, never concatenate)
//! - `null` in the override means "not set" and never replaces or inserts a value

use serde_json::Value;

/// Merge `overrides` into `target` in place.
pub fn deep_merge(target: &mut Value, overrides: &Value) {
    match (target, overrides) {
        (_, Value::Null) => {}
        (Value::Object(target_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                if value.is_null() {
                    continue;
                }
                match target_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        let mut fresh = Value::Null;
                        deep_merge(&mut fresh, value);
                        target_map.insert(key.clone(), fresh);
                    }
                }
            }
        }
        (target, Value::Object(_)) => {
            // Non-object target: start from an empty object so nested nulls are still dropped.
            let mut fresh = Value::Object(serde_json::Map::new());
            deep_merge(&mut fresh, overrides);
            *target = fresh;
        }
        (target, other) => {
            *target = other.clone();
        }
    }
}

/// Non-mutating variant of [`deep_merge`].
pub fn merged(base: &Value, overrides: &Value) -> Value {
    let mut out = base.clone();
    deep_merge(&mut out, overrides);
    out
}
