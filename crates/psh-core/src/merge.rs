//! Deep merge for the open-ended parts of a configuration.
//!
//! Typed sections are merged field by field in [`crate::application`]. The
//! sections that stay free-form JSON (`access`, `runtime`, `resources`,
//! unknown keys, per-service overrides) go through these helpers instead.
//! In both cases the overlay wins: mappings merge recursively, lists merge
//! element by element, everything else is replaced.

use serde_json::{Map, Value};

/// Deep merge `other` into `base`.
///
/// If both values are objects, merge them recursively with `other` taking precedence.
/// If both are lists, merge them by index; extra `other` elements are appended
/// and extra `base` elements are kept. Otherwise, `other` replaces `base`.
pub fn deep_merge_value(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Object(base_map), Value::Object(other_map)) => {
            merge_maps(base_map, other_map);
        }
        (Value::Array(base_items), Value::Array(other_items)) => {
            for (i, other_item) in other_items.iter().enumerate() {
                match base_items.get_mut(i) {
                    Some(base_item) => deep_merge_value(base_item, other_item),
                    None => base_items.push(other_item.clone()),
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

/// Deep merge every entry of `other` into `base`.
pub fn merge_maps(base: &mut Map<String, Value>, other: &Map<String, Value>) {
    for (key, other_val) in other {
        if let Some(base_val) = base.get_mut(key) {
            deep_merge_value(base_val, other_val);
        } else {
            base.insert(key.clone(), other_val.clone());
        }
    }
}

/// Copy of `base` with `other` merged over it, when present.
pub fn merged_map(base: &Map<String, Value>, other: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut merged = base.clone();
    if let Some(other) = other {
        merge_maps(&mut merged, other);
    }
    merged
}

/// Copy of `base` with `other` merged over it; `None` on either side defers to the other.
pub fn merged_optional(base: Option<&Value>, other: Option<&Value>) -> Option<Value> {
    match (base, other) {
        (Some(base), Some(other)) => {
            let mut merged = base.clone();
            deep_merge_value(&mut merged, other);
            Some(merged)
        }
        (None, Some(other)) => Some(other.clone()),
        (base, None) => base.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_objects() {
        let mut base = json!({
            "a": 1,
            "b": { "x": 10, "y": 20 }
        });
        let other = json!({
            "b": { "y": 25, "z": 30 },
            "c": 3
        });

        deep_merge_value(&mut base, &other);

        assert_eq!(base["a"], 1);
        assert_eq!(base["b"]["x"], 10);
        assert_eq!(base["b"]["y"], 25);
        assert_eq!(base["b"]["z"], 30);
        assert_eq!(base["c"], 3);
    }

    #[test]
    fn test_lists_merge_by_index() {
        let mut base = json!({"rules": ["a", "b", "c"], "hosts": [{"name": "x", "port": 1}]});
        let other = json!({"rules": ["z"], "hosts": [{"port": 2}, {"name": "y"}]});

        deep_merge_value(&mut base, &other);

        assert_eq!(
            base,
            json!({
                "rules": ["z", "b", "c"],
                "hosts": [{"name": "x", "port": 2}, {"name": "y"}]
            })
        );
    }

    #[test]
    fn test_scalar_replaces_object() {
        let mut base = json!({"a": {"nested": true}});
        deep_merge_value(&mut base, &json!({"a": "flat"}));
        assert_eq!(base, json!({"a": "flat"}));
    }

    #[test]
    fn test_merged_map_leaves_base_untouched() {
        let base = json!({"keep": 1}).as_object().cloned().unwrap();
        let other = json!({"add": 2}).as_object().cloned().unwrap();

        let merged = merged_map(&base, Some(&other));

        assert_eq!(Value::Object(merged), json!({"keep": 1, "add": 2}));
        assert_eq!(Value::Object(base), json!({"keep": 1}));
    }

    #[test]
    fn test_merged_optional() {
        let base = json!({"cpu": 1, "memory": 512});
        let other = json!({"memory": 1024});

        assert_eq!(
            merged_optional(Some(&base), Some(&other)),
            Some(json!({"cpu": 1, "memory": 1024}))
        );
        assert_eq!(merged_optional(None, Some(&other)), Some(other.clone()));
        assert_eq!(merged_optional(Some(&base), None), Some(base.clone()));
        assert_eq!(merged_optional(None, None), None);
    }
}
