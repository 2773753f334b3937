//! Newline-delimited JSON spoken with the game gateway.
//!
//! The bot sends [`Request`]s; the gateway answers each with a [`Response`]
//! carrying the same id and pushes [`WireEvent`]s at any time in between.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Event pushed by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WireEvent {
    Spawn,
    Chat { username: String, message: String },
    PlayerCollect { collector: String, collected: String },
    Kicked { reason: String },
    End { reason: String },
}

/// Any line the gateway may send
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Inbound {
    Event(WireEvent),
    Response(Response),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_response() {
        let line = r#"{"id":7,"success":true,"result":{"x":1.0,"y":2.0,"z":3.0}}"#;
        match serde_json::from_str::<Inbound>(line).unwrap() {
            Inbound::Response(r) => {
                assert_eq!(r.id, 7);
                assert!(r.success);
                assert!(r.result.is_some());
            }
            other => panic!("expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_inbound_event() {
        let line = r#"{"event":"chat","username":"alex","message":"bt come"}"#;
        match serde_json::from_str::<Inbound>(line).unwrap() {
            Inbound::Event(WireEvent::Chat { username, message }) => {
                assert_eq!(username, "alex");
                assert_eq!(message, "bt come");
            }
            other => panic!("expected chat event, got {:?}", other),
        }
    }

    #[test]
    fn test_error_response_without_result() {
        let line = r#"{"id":3,"success":false,"error":"no such item"}"#;
        match serde_json::from_str::<Inbound>(line).unwrap() {
            Inbound::Response(r) => {
                assert!(!r.success);
                assert_eq!(r.result, None);
                assert_eq!(r.error.as_deref(), Some("no such item"));
            }
            other => panic!("expected response, got {:?}", other),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = Request { id: 9, command: "dig".into(), args: serde_json::json!({"x": 1}) };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"id":9,"command":"dig","args":{"x":1}}"#);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(serde_json::from_str::<Inbound>(r#"{"hello":1}"#).is_err());
    }
}
