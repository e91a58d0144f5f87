//! 后端响应体解释
//!
//! 后端在业务失败时仍可能返回 2xx，响应体为 `{"success": false, "message": ...}`。

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApplicationError;

const DEFAULT_REJECTION: &str = "Operation was rejected";

/// 拒绝 `success: false` 的响应体，其余原样返回
pub fn ensure_accepted(body: Value) -> Result<Value, ApplicationError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_REJECTION);
        return Err(ApplicationError::rejected(message));
    }
    Ok(body)
}

/// 从响应体中读取列表。响应体本身是数组时直接解码，缺少键时返回空列表。
pub fn extract_list<T: DeserializeOwned>(
    body: &Value,
    key: &str,
) -> Result<Vec<T>, ApplicationError> {
    let items = match body {
        Value::Array(_) => body,
        _ => match body.get(key) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(items) => items,
        },
    };
    Ok(Vec::<T>::deserialize(items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejected_body_carries_message() {
        let body = json!({"success": false, "message": "Domain erişim yetkisi yok"});
        let err = ensure_accepted(body).unwrap_err();
        assert!(
            matches!(err, ApplicationError::Rejected(ref m) if m == "Domain erişim yetkisi yok")
        );

        let err = ensure_accepted(json!({"success": false})).unwrap_err();
        assert_eq!(err.to_string(), DEFAULT_REJECTION);
    }

    #[test]
    fn accepted_body_is_untouched() {
        let body = json!({"success": true, "domains": []});
        assert_eq!(ensure_accepted(body.clone()).unwrap(), body);
        assert_eq!(ensure_accepted(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn list_extraction() {
        let ids: Vec<i64> = extract_list(&json!({"items": [1, 2]}), "items").unwrap();
        assert_eq!(ids, vec![1, 2]);

        let ids: Vec<i64> = extract_list(&json!([3]), "items").unwrap();
        assert_eq!(ids, vec![3]);

        let ids: Vec<i64> = extract_list(&json!({"success": true}), "items").unwrap();
        assert!(ids.is_empty());

        assert!(extract_list::<i64>(&json!({"items": "x"}), "items").is_err());
    }
}
