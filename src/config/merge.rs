//! Recursive merge of JSON option trees
//!
//! Used to layer user overrides over the built-in defaults: objects merge
//! key by key, scalars are replaced, arrays either concatenate or merge
//! element by element.

use serde_json::Value;

/// How arrays combine when both sides carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayMerge {
    /// Overlay elements are appended to the base array
    #[default]
    Concat,
    /// Element `i` of the overlay merges into element `i` of the base;
    /// extra overlay elements are appended
    ByIndex,
}

/// Merge `overlay` into `base` in place.
///
/// A `null` in the overlay leaves the base value untouched.
pub fn deep_merge(base: &mut Value, overlay: Value, arrays: ArrayMerge) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value, arrays),
                    None => {
                        if !value.is_null() {
                            base_map.insert(key, value);
                        }
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items)) => match arrays {
            ArrayMerge::Concat => base_items.extend(overlay_items),
            ArrayMerge::ByIndex => {
                for (index, value) in overlay_items.into_iter().enumerate() {
                    match base_items.get_mut(index) {
                        Some(existing) => deep_merge(existing, value, arrays),
                        None => base_items.push(value),
                    }
                }
            }
        },
        (slot, value) => *slot = value,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_objects_merge() {
        let mut base = json!({"a": {"x": 1, "y": 2}, "b": true});
        deep_merge(&mut base, json!({"a": {"y": 3, "z": 4}}), ArrayMerge::Concat);
        assert_eq!(base, json!({"a": {"x": 1, "y": 3, "z": 4}, "b": true}));
    }

    #[test]
    fn test_scalar_overwrites() {
        let mut base = json!({"style": "*"});
        deep_merge(&mut base, json!({"style": "-"}), ArrayMerge::Concat);
        assert_eq!(base["style"], "-");
    }

    #[test]
    fn test_type_change_overwrites() {
        let mut base = json!({"value": [1, 2]});
        deep_merge(&mut base, json!({"value": "flat"}), ArrayMerge::Concat);
        assert_eq!(base["value"], "flat");
    }

    #[test]
    fn test_arrays_concat() {
        let mut base = json!({"list": [1, 2]});
        deep_merge(&mut base, json!({"list": [3]}), ArrayMerge::Concat);
        assert_eq!(base["list"], json!([1, 2, 3]));
    }

    #[test]
    fn test_arrays_by_index() {
        let mut base = json!({"pair": ["[", "](#url#)"]});
        deep_merge(&mut base, json!({"pair": ["<"]}), ArrayMerge::ByIndex);
        assert_eq!(base["pair"], json!(["<", "](#url#)"]));

        deep_merge(&mut base, json!({"pair": [null, null, "extra"]}), ArrayMerge::ByIndex);
        assert_eq!(base["pair"], json!(["<", "](#url#)", "extra"]));
    }

    #[test]
    fn test_null_keeps_base() {
        let mut base = json!({"keep": 1});
        deep_merge(&mut base, json!({"keep": null, "new": null}), ArrayMerge::Concat);
        assert_eq!(base, json!({"keep": 1}));
    }
}
