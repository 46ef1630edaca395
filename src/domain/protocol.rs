// Live query protocol - messages exchanged over the WebSocket
use super::snapshot::Snapshot;
use super::telemetry::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Messages from client to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Ask for the snapshot at-or-before `instant`
    InstantData {
        #[serde(with = "iso_millis")]
        instant: DateTime<Utc>,
    },
}

/// Messages from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// `data` is null when nothing was recorded yet at the requested instant
    InstantData { data: Option<Snapshot> },
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ClientMessage {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        decode(text, &["INSTANT_DATA"])
    }

    pub fn encode(&self) -> String {
        encode(self)
    }
}

impl ServerMessage {
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        decode(text, &["INSTANT_DATA"])
    }

    pub fn encode(&self) -> String {
        encode(self)
    }
}

fn decode<T: for<'de> Deserialize<'de>>(text: &str, known_types: &[&str]) -> Result<T, ProtocolError> {
    serde_json::from_str(text).map_err(|e| {
        // tell an unrecognized discriminator apart from a broken payload
        let kind = serde_json::from_str::<serde_json::Value>(text)
            .ok()
            .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string));
        match kind {
            Some(kind) if !known_types.contains(&kind.as_str()) => ProtocolError::UnknownType(kind),
            _ => ProtocolError::Malformed(e),
        }
    })
}

fn encode<T: Serialize>(msg: &T) -> String {
    // only strings, numbers and options of them - serialization cannot fail
    serde_json::to_string(msg).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_client_message_wire_format() {
        let instant = Utc.with_ymd_and_hms(2018, 8, 18, 10, 0, 0).unwrap();
        let msg = ClientMessage::InstantData { instant };
        assert_eq!(
            msg.encode(),
            r#"{"type":"INSTANT_DATA","instant":"2018-08-18T10:00:00.000Z"}"#
        );
        assert_eq!(ClientMessage::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn test_decode_accepts_browser_iso_strings() {
        let msg = ClientMessage::decode(r#"{"type":"INSTANT_DATA","instant":"2018-08-18T10:00:00.5+00:00"}"#)
            .unwrap();
        let ClientMessage::InstantData { instant } = msg;
        assert_eq!(instant.timestamp_millis() % 1000, 500);
    }

    #[test]
    fn test_absent_snapshot_encodes_as_null() {
        let msg = ServerMessage::InstantData { data: None };
        assert_eq!(msg.encode(), r#"{"type":"INSTANT_DATA","data":null}"#);
        assert_eq!(ServerMessage::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn test_unknown_type() {
        let err = ClientMessage::decode(r#"{"type":"SUBSCRIBE","topic":"x"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownType(t) if t == "SUBSCRIBE"));
    }

    #[test]
    fn test_malformed_payloads() {
        for text in [
            "not json",
            r#"{"instant":"2018-08-18T10:00:00Z"}"#,
            r#"{"type":"INSTANT_DATA","instant":"yesterday"}"#,
            r#"{"type":"INSTANT_DATA"}"#,
        ] {
            assert!(
                matches!(ClientMessage::decode(text), Err(ProtocolError::Malformed(_))),
                "{text}"
            );
        }
    }
}
