use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// Response envelope: `{success, message?, data?}`.
pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

pub fn ok_message(message: &str) -> Json<Value> {
    Json(json!({ "success": true, "message": message }))
}

pub fn ok_with(message: &str, data: Value) -> Json<Value> {
    Json(json!({ "success": true, "message": message, "data": data }))
}

pub fn created(message: &str, data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, ok_with(message, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_success_flag() {
        let body = ok(json!({ "id": "abc" })).0;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], "abc");
    }

    #[test]
    fn message_only_envelope_omits_data() {
        let body = ok_message("Logged out successfully").0;
        assert_eq!(body["success"], true);
        assert!(body.get("data").is_none());
    }
}
