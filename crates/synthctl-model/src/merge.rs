use serde_json::{Map, Value};

/// Shallow merge of two JSON objects: every key present in `overrides`
/// replaces the corresponding key in `base` wholesale, keys absent from
/// `overrides` are left untouched.
///
/// Nested objects are NOT merged recursively. Callers rely on this to swap
/// an entire variant sub-document into `configuration` in one step, so a
/// deep merge here would leak stale fields from the previous variant.
pub fn merge(base: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        base.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().expect("object literal")
    }

    #[test]
    fn override_wins_and_other_keys_survive() {
        let mut base = obj(json!({"a": 1, "b": 2}));
        merge(&mut base, obj(json!({"b": 3, "c": 4})));
        assert_eq!(Value::Object(base), json!({"a": 1, "b": 3, "c": 4}));
    }

    #[test]
    fn nested_objects_are_replaced_not_patched() {
        let mut base = obj(json!({"configuration": {"retries": 2, "script": "old"}}));
        merge(
            &mut base,
            obj(json!({"configuration": {"url": "https://example.com"}})),
        );
        // The whole sub-document is swapped; "retries" and "script" are gone.
        assert_eq!(
            Value::Object(base),
            json!({"configuration": {"url": "https://example.com"}})
        );
    }

    #[test]
    fn empty_overrides_is_identity() {
        let mut base = obj(json!({"a": 1}));
        merge(&mut base, Map::new());
        assert_eq!(Value::Object(base), json!({"a": 1}));
    }
}
