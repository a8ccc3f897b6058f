//! JSON-lines framing between client and backend
//!
//! Outgoing: `{"id":1,"command":"load_config","args":null}` and
//! `{"emit":"config-updated","payload":null}`.
//! Incoming: `{"id":1,"ok":...}`, `{"id":1,"error":"..."}` and
//! `{"event":"recording-started","payload":null}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::session::BackendEvent;

#[derive(Serialize)]
struct RequestFrame<'a> {
    id: u64,
    command: &'a str,
    args: &'a Value,
}

#[derive(Serialize)]
struct EmitFrame<'a> {
    emit: &'a str,
    payload: Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIncoming {
    Response {
        id: u64,
        #[serde(default)]
        ok: Option<Value>,
        #[serde(default)]
        error: Option<String>,
    },
    Event {
        event: String,
        #[serde(default)]
        payload: Value,
    },
}

/// A decoded frame from the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Response {
        id: u64,
        result: Result<Value, String>,
    },
    Event(BackendEvent),
}

/// Encode a command request, newline included
pub fn encode_request(id: u64, command: &str, args: &Value) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(&RequestFrame { id, command, args })?;
    line.push('\n');
    Ok(line)
}

/// Encode a broadcast request, newline included
pub fn encode_emit(event: &BackendEvent) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(&EmitFrame {
        emit: event.name().as_str(),
        payload: event.payload(),
    })?;
    line.push('\n');
    Ok(line)
}

/// Decode one line received from the backend
pub fn decode(line: &str) -> Result<Incoming, String> {
    let value: Value =
        serde_json::from_str(line.trim()).map_err(|e| format!("malformed frame: {}", e))?;
    let id = value.get("id").and_then(Value::as_u64);

    let raw = match serde_json::from_value::<RawIncoming>(value) {
        Ok(raw) => raw,
        // A response we cannot read still settles the call waiting on its id.
        Err(e) => match id {
            Some(id) => {
                return Ok(Incoming::Response {
                    id,
                    result: Err(format!("malformed response: {}", e)),
                })
            }
            None => return Err(format!("malformed frame: {}", e)),
        },
    };

    match raw {
        RawIncoming::Response { id, ok, error } => {
            let result = match error {
                Some(message) => Err(message),
                None => Ok(ok.unwrap_or(Value::Null)),
            };
            Ok(Incoming::Response { id, result })
        }
        RawIncoming::Event { event, payload } => {
            BackendEvent::from_wire(&event, &payload).map(Incoming::Event)
        }
    }
}
