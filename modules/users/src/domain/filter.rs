use serde_json::{Map, Value};

/// Profile fields a user may change through the profile-update path.
pub const PROFILE_FIELDS: &[&str] = &["username", "email"];

/// Return a copy of `source` holding only the keys listed in `allowed`.
///
/// Values are carried over unchanged; the input is never mutated.
#[must_use]
pub fn filter_fields(source: &Map<String, Value>, allowed: &[&str]) -> Map<String, Value> {
    source
        .iter()
        .filter(|(key, _)| allowed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn keeps_only_allowed_keys() {
        let input = object(json!({"username": "al", "role": "admin"}));
        let out = filter_fields(&input, PROFILE_FIELDS);
        assert_eq!(Value::Object(out), json!({"username": "al"}));
    }

    #[test]
    fn output_is_intersection_with_equal_values() {
        let input = object(json!({
            "username": {"nested": [1, 2]},
            "email": null,
            "password": "secret",
            "active": false
        }));
        let out = filter_fields(&input, PROFILE_FIELDS);

        let mut keys: Vec<_> = out.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["email", "username"]);
        for (k, v) in &out {
            assert_eq!(Some(v), input.get(k));
        }
    }

    #[test]
    fn no_allowed_keys_yields_empty_map() {
        let input = object(json!({"role": "admin", "photo": "x.png"}));
        assert!(filter_fields(&input, PROFILE_FIELDS).is_empty());
        assert!(filter_fields(&Map::new(), PROFILE_FIELDS).is_empty());
    }

    #[test]
    fn input_is_left_untouched() {
        let input = object(json!({"username": "al", "role": "admin"}));
        let before = input.clone();
        let _ = filter_fields(&input, &["username"]);
        assert_eq!(input, before);
    }

    #[test]
    fn empty_allow_list_drops_everything() {
        let input = object(json!({"username": "al"}));
        assert!(filter_fields(&input, &[]).is_empty());
    }
}
