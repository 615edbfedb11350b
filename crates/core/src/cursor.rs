//! Opaque keyset-pagination cursor.
//!
//! A cursor is the serialized `(date, id, order)` triple pointing into
//! the total order over `(date, _id)`. It carries no server-side
//! session and no integrity check: a forged cursor selects a
//! different-but-valid page, nothing more.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{MomentId, Timestamp};

/// Sort direction for the moments listing and its cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// A pointer just past one row of the `(date, _id)` total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub date: Timestamp,
    pub id: MomentId,
    pub order: SortOrder,
}

/// Wire shape: compact JSON, then URL-safe base64 without padding.
#[derive(Serialize, Deserialize)]
struct CursorWire {
    date: String,
    id: String,
    order: String,
}

impl Cursor {
    /// Serialize to the opaque string handed to clients.
    pub fn encode(&self) -> String {
        let wire = CursorWire {
            date: self.date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            id: self.id.to_hex(),
            order: self.order.as_str().to_string(),
        };
        let json = serde_json::to_string(&wire).expect("cursor wire shape is serializable");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a client-supplied cursor string, tolerating base64
    /// padding. Every failure collapses into [`CoreError::InvalidCursor`].
    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw.trim_end_matches('='))
            .map_err(|_| CoreError::InvalidCursor)?;
        let wire: CursorWire =
            serde_json::from_slice(&bytes).map_err(|_| CoreError::InvalidCursor)?;

        let date = DateTime::parse_from_rfc3339(&wire.date)
            .map_err(|_| CoreError::InvalidCursor)?
            .with_timezone(&Utc);
        let id = MomentId::parse_str(&wire.id).map_err(|_| CoreError::InvalidCursor)?;
        let order = SortOrder::parse(&wire.order).ok_or(CoreError::InvalidCursor)?;

        Ok(Self { date, id, order })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_cursor(order: SortOrder) -> Cursor {
        Cursor {
            date: Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap(),
            id: MomentId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap(),
            order,
        }
    }

    #[test]
    fn round_trips_exactly() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let cursor = sample_cursor(order);
            assert_eq!(Cursor::decode(&cursor.encode()), Ok(cursor));
        }
    }

    #[test]
    fn round_trips_millisecond_dates() {
        let cursor = Cursor {
            date: Utc
                .timestamp_millis_opt(1_767_052_800_123)
                .single()
                .unwrap(),
            ..sample_cursor(SortOrder::Desc)
        };
        assert_eq!(Cursor::decode(&cursor.encode()), Ok(cursor));
    }

    #[test]
    fn encoded_form_is_url_safe_json() {
        let encoded = sample_cursor(SortOrder::Asc).encode();
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));

        let decoded = URL_SAFE_NO_PAD.decode(&encoded).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(value["date"], "2026-02-10T12:00:00Z");
        assert_eq!(value["id"], "65a1b2c3d4e5f60718293a4b");
        assert_eq!(value["order"], "asc");
    }

    #[test]
    fn accepts_padded_input() {
        let encoded = sample_cursor(SortOrder::Desc).encode();
        let padded = format!("{encoded}{}", "=".repeat((4 - encoded.len() % 4) % 4));
        assert_eq!(
            Cursor::decode(&padded),
            Ok(sample_cursor(SortOrder::Desc))
        );
    }

    #[test]
    fn rejects_tampered_base64() {
        assert_eq!(
            Cursor::decode("not!!valid!!base64"),
            Err(CoreError::InvalidCursor)
        );
    }

    #[test]
    fn rejects_non_json_payload() {
        let raw = URL_SAFE_NO_PAD.encode("definitely not json");
        assert_eq!(Cursor::decode(&raw), Err(CoreError::InvalidCursor));
    }

    #[test]
    fn rejects_missing_fields() {
        let raw = URL_SAFE_NO_PAD.encode(r#"{"date":"2026-02-10T12:00:00Z","order":"asc"}"#);
        assert_eq!(Cursor::decode(&raw), Err(CoreError::InvalidCursor));
    }

    #[test]
    fn rejects_naive_date() {
        let raw = URL_SAFE_NO_PAD.encode(
            r#"{"date":"2026-02-10T12:00:00","id":"65a1b2c3d4e5f60718293a4b","order":"asc"}"#,
        );
        assert_eq!(Cursor::decode(&raw), Err(CoreError::InvalidCursor));
    }

    #[test]
    fn rejects_malformed_id() {
        let raw = URL_SAFE_NO_PAD
            .encode(r#"{"date":"2026-02-10T12:00:00Z","id":"zzz","order":"asc"}"#);
        assert_eq!(Cursor::decode(&raw), Err(CoreError::InvalidCursor));
    }

    #[test]
    fn rejects_unknown_order() {
        let raw = URL_SAFE_NO_PAD.encode(
            r#"{"date":"2026-02-10T12:00:00Z","id":"65a1b2c3d4e5f60718293a4b","order":"up"}"#,
        );
        assert_eq!(Cursor::decode(&raw), Err(CoreError::InvalidCursor));
    }
}
