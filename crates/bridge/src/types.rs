//! Wire types for the bridge's HTTP API.
//!
//! The deployed bridge variants drifted on field names over time (`qr_string`
//! vs `qr_code`, a string `status` enum vs a `connected` boolean), so these
//! types deserialize tolerantly via aliases and optional fields. Everything
//! gangway exposes outward uses the canonical shapes in the tools crate; the
//! drift is absorbed here and goes no further.

use serde::{Deserialize, Serialize};

/// `GET /api/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeStatus {
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// `GET /api/qr`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeQr {
    /// Raw pairing string. Older bridges call this `qr_code`.
    #[serde(default, alias = "qr_code")]
    pub qr_string: Option<String>,
    /// Pre-rendered ASCII, when the bridge provides one.
    #[serde(default)]
    pub qr_ascii: Option<String>,
    /// Pre-rendered base64 PNG, when the bridge provides one.
    #[serde(default, alias = "qr_image")]
    pub qr_base64: Option<String>,
    /// Session state as the bridge sees it: `connected`, `pending`,
    /// `expired`, or `disconnected`. Absent on bridges that only ever
    /// return a pairing string.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BridgeQr {
    /// Did the bridge explicitly flag the previous session as expired?
    #[must_use]
    pub fn session_expired(&self) -> bool {
        self.status.as_deref() == Some("expired")
    }
}

/// `POST /api/send`, `/api/send-media`, `/api/send-audio`
#[derive(Debug, Clone, Deserialize)]
pub struct SendAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/download-media`
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadAck {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/reauth`
#[derive(Debug, Clone, Deserialize)]
pub struct ReauthAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body for `POST /api/send`.
#[derive(Debug, Clone, Serialize)]
pub struct SendTextRequest<'a> {
    pub recipient: &'a str,
    pub message: &'a str,
}

/// Body for `POST /api/download-media`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest<'a> {
    pub message_id: &'a str,
    pub chat_jid: &'a str,
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_accepts_both_field_spellings() {
        let new: BridgeQr = serde_json::from_str(r#"{"qr_string": "2@abc"}"#).unwrap();
        assert_eq!(new.qr_string.as_deref(), Some("2@abc"));

        let old: BridgeQr = serde_json::from_str(r#"{"qr_code": "2@abc"}"#).unwrap();
        assert_eq!(old.qr_string.as_deref(), Some("2@abc"));
    }

    #[test]
    fn qr_expired_only_on_explicit_status() {
        let expired: BridgeQr =
            serde_json::from_str(r#"{"status": "expired", "message": "QR code has expired"}"#)
                .unwrap();
        assert!(expired.session_expired());

        let bare: BridgeQr = serde_json::from_str("{}").unwrap();
        assert!(!bare.session_expired());

        let disconnected: BridgeQr =
            serde_json::from_str(r#"{"status": "disconnected"}"#).unwrap();
        assert!(!disconnected.session_expired());
    }

    #[test]
    fn status_tolerates_missing_fields() {
        let s: BridgeStatus = serde_json::from_str("{}").unwrap();
        assert!(!s.connected);
        assert!(s.phone_number.is_none());

        let s: BridgeStatus =
            serde_json::from_str(r#"{"connected": true, "phone_number": "+15551234567"}"#).unwrap();
        assert!(s.connected);
        assert_eq!(s.phone_number.as_deref(), Some("+15551234567"));
    }
}
