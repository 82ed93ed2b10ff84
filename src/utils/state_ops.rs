//! Dotted-path editing of a JSON design state, used by `sareectl --state`.
use serde_json::{json, Map, Value};

use crate::error::{AppError, AppResult};

/// Parse `path=value` items into (`["body", "color"]`, value) pairs.
pub fn parse_set_pairs(items: &[String]) -> AppResult<Vec<(Vec<String>, Value)>> {
    let mut out = Vec::new();
    for s in items {
        let Some((k, val)) = s.split_once('=') else {
            return Err(AppError::InvalidInput(format!("invalid '{}', expected PATH=VALUE", s)));
        };
        let key_path: Vec<String> = k.split('.').map(|p| p.trim().to_string()).collect();
        if key_path.iter().any(|p| p.is_empty()) {
            return Err(AppError::InvalidInput(format!("invalid path in '{}'", s)));
        }
        out.push((key_path, parse_value(val)));
    }
    Ok(out)
}

/// Interpret a CLI value as JSON when possible, else as a plain string.
///
/// Colors such as `#8B0000` stay strings.
pub fn parse_value(src: &str) -> Value {
    if let Ok(v) = serde_json::from_str::<Value>(src) {
        return v;
    }
    if src.eq_ignore_ascii_case("null") { return Value::Null; }
    if src.eq_ignore_ascii_case("true") { return Value::Bool(true); }
    if src.eq_ignore_ascii_case("false") { return Value::Bool(false); }
    if let Ok(i) = src.parse::<i64>() { return Value::from(i); }
    if let Ok(f) = src.parse::<f64>() { return json!(f); }
    Value::String(src.to_string())
}

/// Set `path` inside `root`, creating intermediate objects as needed.
/// Returns false when a non-object value sits in the way.
pub fn apply_set_path(root: &mut Value, path: &[String], new_val: Value) -> bool {
    let Some((last, parents)) = path.split_last() else { return false };
    if root.is_null() {
        *root = Value::Object(Map::new());
    }
    let mut cur = root;
    for key in parents {
        let Value::Object(map) = cur else { return false };
        cur = map.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
    }
    match cur {
        Value::Object(map) => {
            map.insert(last.clone(), new_val);
            true
        }
        _ => false,
    }
}

/// Build a state object from `path=value` items.
pub fn build_state(items: &[String]) -> AppResult<Value> {
    let mut state = Value::Object(Map::new());
    for (path, val) in parse_set_pairs(items)? {
        if !apply_set_path(&mut state, &path, val) {
            return Err(AppError::InvalidInput(format!(
                "cannot set '{}': parent is not an object",
                path.join(".")
            )));
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_nests_paths() {
        let state = build_state(&[
            "body.color=#8B0000".to_string(),
            "body.pattern=Paisley".to_string(),
            "zari=Gold".to_string(),
        ])
        .unwrap();
        assert_eq!(state, json!({"body": {"color": "#8B0000", "pattern": "Paisley"}, "zari": "Gold"}));
    }

    #[test]
    fn test_parse_value_types() {
        assert_eq!(parse_value("2"), json!(2));
        assert_eq!(parse_value("1.5"), json!(1.5));
        assert_eq!(parse_value("TRUE"), json!(true));
        assert_eq!(parse_value("Temple Border"), json!("Temple Border"));
    }

    #[test]
    fn test_parse_set_pairs_rejects_missing_equals() {
        assert!(parse_set_pairs(&["body.color".to_string()]).is_err());
        assert!(parse_set_pairs(&["body..color=red".to_string()]).is_err());
    }

    #[test]
    fn test_apply_set_path_blocked_by_scalar() {
        let mut state = json!({"body": "plain"});
        assert!(!apply_set_path(&mut state, &["body".into(), "color".into()], json!("red")));
    }
}
