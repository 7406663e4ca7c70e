//! Typed results the backend hands to the tool layer.

use {
    gangway_bridge::{QrCredential, StatusSnapshot},
    serde::Serialize,
};

/// Result of a status query: the snapshot plus the probe verdict, which the
/// tool surface reports as its own `bridge_running` field.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub bridge_running: bool,
    #[serde(flatten)]
    pub snapshot: StatusSnapshot,
}

/// Result of a QR fetch. `credential` is absent when the bridge has no
/// outstanding pairing offer (typically because a session already exists).
#[derive(Debug, Clone, Serialize)]
pub struct QrReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<QrCredential>,
    pub message: String,
}

/// Outcome of a side-effecting bridge call (send, reauth).
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Outcome of a media download request.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub message: String,
}
