//! Coarse response checks: array, non-null object, or nothing at all.
//!
//! A payload that passes its check is mapped onto the typed entity as is;
//! individual fields are not validated here.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

fn mismatch(operation: &'static str, value: &Value) -> ApiError {
    warn!(operation, kind = kind(value), "unexpected response shape");
    ApiError::Shape { operation }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn expect_list<T: DeserializeOwned>(
    operation: &'static str,
    value: Value,
) -> Result<Vec<T>, ApiError> {
    if !value.is_array() {
        return Err(mismatch(operation, &value));
    }
    decode(operation, value)
}

pub(crate) fn expect_object<T: DeserializeOwned>(
    operation: &'static str,
    value: Value,
) -> Result<T, ApiError> {
    if !value.is_object() {
        return Err(mismatch(operation, &value));
    }
    decode(operation, value)
}

pub(crate) fn expect_empty(operation: &'static str, value: Value) -> Result<(), ApiError> {
    if !value.is_null() {
        return Err(mismatch(operation, &value));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(operation: &'static str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode { operation, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_rejects_object() {
        let err = expect_list::<Value>("get_comments", json!({"items": []})).unwrap_err();
        assert!(matches!(err, ApiError::Shape { operation: "get_comments" }));
    }

    #[test]
    fn list_accepts_empty_array() {
        let items: Vec<Value> = expect_list("get_posts", json!([])).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn object_rejects_null_and_array() {
        assert!(matches!(
            expect_object::<Value>("get_post", Value::Null),
            Err(ApiError::Shape { .. })
        ));
        assert!(matches!(
            expect_object::<Value>("get_post", json!([{}])),
            Err(ApiError::Shape { .. })
        ));
    }

    #[test]
    fn empty_rejects_anything_but_null() {
        assert!(expect_empty("delete_post", Value::Null).is_ok());
        let err = expect_empty("delete_post", json!({"ok": true})).unwrap_err();
        assert_eq!(err.to_string(), "Invalid response for delete_post");
    }

    #[test]
    fn object_with_wrong_fields_is_decode_error() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Named {
            name: String,
        }
        let err = expect_object::<Named>("get_post", json!({"title": "x"})).unwrap_err();
        assert!(matches!(err, ApiError::Decode { operation: "get_post", .. }));
    }
}
