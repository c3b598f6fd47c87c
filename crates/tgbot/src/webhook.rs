//! Inbound updates: decode webhook request bodies and track polling offsets.
//!
//! The HTTP server receiving webhook deliveries belongs to the embedding
//! application; it hands the raw body to [`decode_update`] or streams it
//! through [`read_update`].

use crate::error::{BotError, BotResult};
use crate::types::CallResult;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Decode a webhook body as JSON, unmodified.
pub fn decode_update(body: &[u8]) -> BotResult<Value> {
    serde_json::from_slice(body).map_err(|e| BotError::Decode {
        body: String::from_utf8_lossy(body).into_owned(),
        message: e.to_string(),
    })
}

/// Read an entire request body from `reader` and decode it.
pub async fn read_update<R>(mut reader: R) -> BotResult<Value>
where
    R: AsyncRead + Unpin,
{
    let mut body = Vec::new();
    reader.read_to_end(&mut body).await?;
    decode_update(&body)
}

/// Offset for the next `getUpdates` call: highest `update_id` + 1.
///
/// `None` when the response carries no updates or the id cannot advance.
pub fn next_offset(response: &CallResult) -> Option<i64> {
    response
        .result()?
        .as_array()?
        .iter()
        .filter_map(|u| u.get("update_id").and_then(Value::as_i64))
        .max()
        .and_then(|id| id.checked_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_valid_update() {
        let body = br#"{"update_id":10,"message":{"message_id":1,"text":"/start"}}"#;
        let update = decode_update(body).unwrap();
        assert_eq!(update["update_id"], 10);
        assert_eq!(update["message"]["text"], "/start");
    }

    #[test]
    fn decode_invalid_body() {
        match decode_update(b"not json").unwrap_err() {
            BotError::Decode { body, .. } => assert_eq!(body, "not json"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decode_empty_body_is_an_error() {
        assert!(matches!(decode_update(b""), Err(BotError::Decode { .. })));
    }

    #[tokio::test]
    async fn read_whole_body() {
        let body: &[u8] = br#"{"update_id":7,"callback_query":{"id":"q","data":"go"}}"#;
        let update = read_update(body).await.unwrap();
        assert_eq!(update["callback_query"]["data"], "go");
    }

    #[test]
    fn next_offset_from_updates() {
        let response = CallResult::Completed(json!({
            "ok": true,
            "result": [{"update_id": 100}, {"update_id": 103}, {"update_id": 101}]
        }));
        assert_eq!(next_offset(&response), Some(104));
    }

    #[test]
    fn next_offset_at_max_id_does_not_overflow() {
        let response = CallResult::Completed(json!({
            "ok": true,
            "result": [{"update_id": i64::MAX}]
        }));
        assert_eq!(next_offset(&response), None);
    }

    #[test]
    fn next_offset_none_when_empty() {
        let empty = CallResult::Completed(json!({"ok": true, "result": []}));
        assert_eq!(next_offset(&empty), None);
        assert_eq!(next_offset(&CallResult::Dispatched), None);
        let failed = CallResult::Completed(json!({"ok": false, "error_code": 409}));
        assert_eq!(next_offset(&failed), None);
    }
}
