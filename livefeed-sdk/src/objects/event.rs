//! Event objects delivered by the push API.
//!
//! On the wire an event is a flat JSON object:
//!
//! ```json
//! {"id": "m-17", "type": "message", "timestamp": 1718000000000, "user": "alice", "text": "hi"}
//! ```
//!
//! `id`, `type` and `timestamp` (unix milliseconds) are required. Every other
//! field is kept verbatim as the event payload and handed to the renderer
//! untouched.

use compact_str::{CompactString, ToCompactString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use time::OffsetDateTime;

/// Stable identifier of an event across duplicate deliveries.
///
/// Numeric ids are normalized to their decimal string form, so `17` and
/// `"17"` name the same event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(CompactString);

impl EventId {
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(CompactString::from(value))
    }
}

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        Self(value.to_compact_string())
    }
}

/// Kind of an event.
///
/// Only animated gifts and messages get special treatment from the
/// scheduler. Any other kind is carried as [`EventKind::Other`] and handled
/// as an ordinary event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A gift that plays an exclusive animation (`"animated_gift"`).
    AnimatedGift,
    /// A chat message, subject to the freshness rule (`"message"`).
    Message,
    /// Anything else, kept under its wire name.
    Other(CompactString),
}

impl EventKind {
    pub const ANIMATED_GIFT: &'static str = "animated_gift";
    pub const MESSAGE: &'static str = "message";

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::AnimatedGift => Self::ANIMATED_GIFT,
            EventKind::Message => Self::MESSAGE,
            EventKind::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            Self::ANIMATED_GIFT => EventKind::AnimatedGift,
            Self::MESSAGE => EventKind::Message,
            other => EventKind::Other(CompactString::from(other)),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = CompactString::deserialize(deserializer)?;
        Ok(EventKind::from(name.as_str()))
    }
}

/// Reasons an event object is refused at decode time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("event is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
}

/// A validated event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub kind: EventKind,
    /// Creation time reported by the push API.
    pub timestamp: OffsetDateTime,
    /// Every wire field other than `id`, `type` and `timestamp`.
    pub payload: Map<String, Value>,
}

impl Event {
    pub fn new(id: impl Into<EventId>, kind: EventKind, timestamp: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            kind,
            timestamp,
            payload: Map::new(),
        }
    }

    /// Attach a payload field, replacing any previous value under `key`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn is_animated_gift(&self) -> bool {
        self.kind == EventKind::AnimatedGift
    }

    pub fn is_message(&self) -> bool {
        self.kind == EventKind::Message
    }

    /// Time elapsed between creation and `now`. Negative for clock skew.
    pub fn age_at(&self, now: OffsetDateTime) -> time::Duration {
        now - self.timestamp
    }

    fn timestamp_millis(&self) -> i64 {
        (self.timestamp.unix_timestamp_nanos() / 1_000_000) as i64
    }
}

/// Event object as it arrives, before validation.
///
/// `null` is treated the same as an absent field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TryFrom<RawEvent> for Event {
    type Error = EventError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let id = match raw.id.ok_or(EventError::MissingField("id"))? {
            Value::String(s) if !s.is_empty() => EventId::from(s.as_str()),
            Value::String(_) => return Err(invalid("id", "must not be empty")),
            Value::Number(n) => n
                .as_u64()
                .map(EventId::from)
                .ok_or_else(|| invalid("id", "numeric id must be a non-negative integer"))?,
            _ => return Err(invalid("id", "expected a string or an integer")),
        };

        let kind = match raw.kind.ok_or(EventError::MissingField("type"))? {
            Value::String(s) if !s.is_empty() => EventKind::from(s.as_str()),
            Value::String(_) => return Err(invalid("type", "must not be empty")),
            _ => return Err(invalid("type", "expected a string")),
        };

        let millis = match raw.timestamp.ok_or(EventError::MissingField("timestamp"))? {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| invalid("timestamp", "expected integer milliseconds"))?,
            _ => return Err(invalid("timestamp", "expected integer milliseconds")),
        };
        let timestamp = OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map_err(|_| invalid("timestamp", "out of range"))?;

        Ok(Event {
            id,
            kind,
            timestamp,
            payload: raw.payload,
        })
    }
}

fn invalid(field: &'static str, reason: &'static str) -> EventError {
    EventError::InvalidField { field, reason }
}

#[derive(Serialize)]
struct WireEventRef<'a> {
    id: &'a EventId,
    #[serde(rename = "type")]
    kind: &'a EventKind,
    timestamp: i64,
    #[serde(flatten)]
    payload: &'a Map<String, Value>,
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireEventRef {
            id: &self.id,
            kind: &self.kind,
            timestamp: self.timestamp_millis(),
            payload: &self.payload,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEvent::deserialize(deserializer)?;
        Event::try_from(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_numeric_and_string_ids_normalize() {
        let a = Event::try_from(raw(json!({"id": 17, "type": "message", "timestamp": 0}))).unwrap();
        let b =
            Event::try_from(raw(json!({"id": "17", "type": "message", "timestamp": 0}))).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_str(), "17");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(EventKind::from("animated_gift"), EventKind::AnimatedGift);
        assert_eq!(EventKind::from("message"), EventKind::Message);
        assert_eq!(
            EventKind::from("follow"),
            EventKind::Other(CompactString::from("follow"))
        );
        assert_eq!(EventKind::from("follow").as_str(), "follow");
    }

    #[test]
    fn test_payload_is_kept() {
        let event = Event::try_from(raw(json!({
            "id": "g-1",
            "type": "animated_gift",
            "timestamp": 1_718_000_000_123_i64,
            "gift": "rocket",
            "count": 3
        })))
        .unwrap();

        assert!(event.is_animated_gift());
        assert_eq!(event.payload.len(), 2);
        assert_eq!(event.payload["gift"], json!("rocket"));
        assert_eq!(event.timestamp.unix_timestamp(), 1_718_000_000);
        assert_eq!(event.timestamp.millisecond(), 123);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let no_id = Event::try_from(raw(json!({"type": "message", "timestamp": 0})));
        assert_eq!(no_id, Err(EventError::MissingField("id")));

        let null_type =
            Event::try_from(raw(json!({"id": "a", "type": null, "timestamp": 0})));
        assert_eq!(null_type, Err(EventError::MissingField("type")));

        let no_ts = Event::try_from(raw(json!({"id": "a", "type": "message"})));
        assert_eq!(no_ts, Err(EventError::MissingField("timestamp")));
    }

    #[test]
    fn test_wrong_typed_fields_are_rejected() {
        let cases = [
            json!({"id": "", "type": "message", "timestamp": 0}),
            json!({"id": -4, "type": "message", "timestamp": 0}),
            json!({"id": ["x"], "type": "message", "timestamp": 0}),
            json!({"id": "a", "type": 3, "timestamp": 0}),
            json!({"id": "a", "type": "message", "timestamp": "yesterday"}),
            json!({"id": "a", "type": "message", "timestamp": 1.5}),
        ];
        for case in cases {
            let result = Event::try_from(raw(case.clone()));
            assert!(
                matches!(result, Err(EventError::InvalidField { .. })),
                "expected rejection for {case}"
            );
        }
    }

    #[test]
    fn test_out_of_range_numbers_report_field() {
        let negative_id = Event::try_from(raw(json!({"id": -4, "type": "message", "timestamp": 0})));
        assert_eq!(
            negative_id,
            Err(EventError::InvalidField {
                field: "id",
                reason: "numeric id must be a non-negative integer",
            })
        );

        let fractional_ts =
            Event::try_from(raw(json!({"id": 7, "type": "message", "timestamp": 1.5})));
        assert_eq!(
            fractional_ts,
            Err(EventError::InvalidField {
                field: "timestamp",
                reason: "expected integer milliseconds",
            })
        );

        let valid = Event::try_from(raw(json!({"id": 7, "type": "message", "timestamp": 5})));
        assert!(valid.is_ok());
    }

    #[test]
    fn test_serialize_uses_wire_shape() {
        let ts = OffsetDateTime::from_unix_timestamp(1_718_000_000).unwrap();
        let event = Event::new(42_u64, EventKind::Message, ts).with_field("text", "hello");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({"id": "42", "type": "message", "timestamp": 1_718_000_000_000_i64, "text": "hello"})
        );
    }

    #[test]
    fn test_deserialize_reports_validation_error() {
        let err = serde_json::from_str::<Event>(r#"{"type":"message","timestamp":0}"#).unwrap_err();
        assert!(err.to_string().contains("missing field `id`"));
    }
}
