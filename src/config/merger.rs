//! Deep merge for layered YAML settings.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences are replaced entirely (not merged)
//! - Null values in overlay delete the key, restoring the built-in default
//! - Scalars in overlay replace scalars in base

use serde_yaml::Value;

/// Deep merge two YAML values. `overlay` wins at the point of conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }

        // An empty file parses to Null and changes nothing.
        (base, Value::Null) => base.clone(),

        (_, overlay) => overlay.clone(),
    }
}

/// Merge multiple layers in order (later overrides earlier).
pub fn merge_layers(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn scalars_in_overlay_win() {
        let base = yaml("attempts: 3\ndefault_registry: https://a.example/");
        let overlay = yaml("attempts: 5");

        let result = deep_merge(&base, &overlay);

        assert_eq!(result["attempts"], 5);
        assert_eq!(result["default_registry"], "https://a.example/");
    }

    #[test]
    fn null_removes_inherited_value() {
        let base = yaml("attempts: 3\nmanager: pnpm");
        let overlay = yaml("manager: null");

        let result = deep_merge(&base, &overlay);

        assert!(result.get("manager").is_none());
        assert_eq!(result["attempts"], 3);
    }

    #[test]
    fn empty_overlay_returns_base_unchanged() {
        let base = yaml("attempts: 3");

        assert_eq!(deep_merge(&base, &Value::Null), base);
        assert_eq!(deep_merge(&base, &yaml("{}")), base);
    }

    #[test]
    fn merge_layers_applies_in_order() {
        let layers = vec![yaml("a: 1\nb: 2"), yaml("b: 3\nc: 4"), yaml("c: 5")];

        let result = merge_layers(&layers);

        assert_eq!(result["a"], 1);
        assert_eq!(result["b"], 3);
        assert_eq!(result["c"], 5);
    }
}
