//! Structural checks on a decoded status payload.

use serde_json::Value;

use watch_common::error::WatchError;
use watch_common::types::WorkItemRecord;

/// Longest slice of a payload quoted in a diagnostic, in characters.
const EXCERPT_CHARS: usize = 200;

/// Render `value` for a diagnostic, cut to [`EXCERPT_CHARS`].
fn excerpt(value: &Value) -> String {
    let text = value.to_string();
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text,
    }
}

/// Check the payload shape and return the `homeworks` sequence untouched.
pub fn validate(payload: &Value) -> Result<&[Value], WatchError> {
    let Some(object) = payload.as_object() else {
        return Err(WatchError::Shape(format!(
            "ответ {} не является словарём",
            excerpt(payload)
        )));
    };

    let Some(homeworks) = object.get("homeworks") else {
        return Err(WatchError::Shape(
            "данные по ключу \"homeworks\" отсутствуют".to_string(),
        ));
    };

    match homeworks.as_array() {
        Some(items) => Ok(items.as_slice()),
        None => Err(WatchError::Shape(format!(
            "данные {} по ключу \"homeworks\" не являются списком",
            excerpt(homeworks)
        ))),
    }
}

/// Pull name and status out of one element of `homeworks`.
pub fn parse_record(item: &Value) -> Result<WorkItemRecord, WatchError> {
    serde_json::from_value::<WorkItemRecord>(item.clone()).map_err(|e| {
        WatchError::Shape(format!(
            "запись о работе {} некорректна: {e}",
            excerpt(item)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_returns_sequence_unchanged() {
        let payload = json!({
            "homeworks": [
                {"homework_name": "hw2", "status": "reviewing"},
                {"homework_name": "hw1", "status": "approved"}
            ],
            "current_date": 1000
        });
        let items = validate(&payload).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["homework_name"], "hw2");
        assert_eq!(items[1]["homework_name"], "hw1");
    }

    #[test]
    fn test_validate_empty_list_is_ok() {
        let payload = json!({"homeworks": []});
        assert!(validate(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_validate_rejects_non_mapping() {
        for payload in [json!([1, 2]), json!("homeworks"), json!(null), json!(42)] {
            assert!(matches!(validate(&payload), Err(WatchError::Shape(_))));
        }
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let payload = json!({"current_date": 1000});
        assert!(matches!(validate(&payload), Err(WatchError::Shape(_))));
    }

    #[test]
    fn test_validate_rejects_non_list() {
        let payload = json!({"homeworks": "not-a-list"});
        let err = validate(&payload).unwrap_err();
        assert!(matches!(err, WatchError::Shape(_)));
        assert!(err.to_string().contains("not-a-list"));

        let payload = json!({"homeworks": {"homework_name": "hw1"}});
        assert!(matches!(validate(&payload), Err(WatchError::Shape(_))));
    }

    #[test]
    fn test_shape_error_quotes_only_an_excerpt() {
        let items: Vec<Value> = (0..500)
            .map(|i| json!({"homework_name": format!("hw{i}"), "status": "approved"}))
            .collect();
        let payload = json!({"homeworks": {"items": items}});

        let text = validate(&payload).unwrap_err().to_string();
        assert!(text.contains('…'));
        assert!(text.chars().count() < 400);
    }

    #[test]
    fn test_excerpt_keeps_short_values_whole() {
        assert_eq!(excerpt(&json!("not-a-list")), "\"not-a-list\"");
        let long = json!("ж".repeat(300));
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 1);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_parse_record() {
        let record = parse_record(&json!({"homework_name": "hw1", "status": "approved"})).unwrap();
        assert_eq!(record.name, "hw1");
        assert_eq!(record.status_code, "approved");
    }

    #[test]
    fn test_parse_record_missing_field() {
        let err = parse_record(&json!({"status": "approved"})).unwrap_err();
        assert!(matches!(err, WatchError::Shape(_)));
    }

    #[test]
    fn test_parse_record_not_an_object() {
        assert!(matches!(parse_record(&json!("hw1")), Err(WatchError::Shape(_))));
    }
}
