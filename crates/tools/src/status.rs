//! Connection and authentication tools — the part of the catalog with real
//! failure-mode behavior behind it.

use std::{sync::Arc, time::Duration};

use {
    anyhow::Result,
    async_trait::async_trait,
    serde_json::{Value, json},
};

use gangway_backend::WhatsAppBackend;

use crate::{
    outcome::{absorb_error, u32_or},
    registry::AgentTool,
};

// ── get_status ──────────────────────────────────────────────────────────────

/// Connection status, with pairing credentials attached while a login is
/// pending.
pub struct GetStatusTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl GetStatusTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for GetStatusTool {
    fn name(&self) -> &str {
        "get_status"
    }

    fn description(&self) -> &str {
        "Get the WhatsApp connection status. Reports whether the bridge \
         process is running and whether a session is authenticated; while \
         authentication is pending, includes the QR code to scan (raw \
         string, ASCII art, and a PNG data URI)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": [],
            "additionalProperties": false
        })
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        let report = match self.backend.status().await {
            Ok(report) => report,
            Err(e) => return Ok(absorb_error(&e)),
        };

        let snapshot = &report.snapshot;
        let mut result = json!({
            "success": true,
            "connected": snapshot.is_connected(),
            "bridge_running": report.bridge_running,
            "status": snapshot.state().to_string(),
            "message": snapshot.message(),
        });

        if let Some(phone) = snapshot.phone_number() {
            result["phone_number"] = json!(phone);
        }
        if let Some(qr) = snapshot.qr() {
            result["qr_code"] = json!(qr.raw);
            result["qr_ascii"] = json!(qr.ascii);
            result["qr_image"] = json!(qr.image_data_uri);
        }

        Ok(result)
    }
}

// ── get_qr ──────────────────────────────────────────────────────────────────

/// Fetch the current pairing QR code directly.
pub struct GetQrTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl GetQrTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for GetQrTool {
    fn name(&self) -> &str {
        "get_qr"
    }

    fn description(&self) -> &str {
        "Get the WhatsApp pairing QR code, freshly rendered. Fails (without \
         raising) when no pairing is outstanding — usually because a session \
         is already authenticated."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": [],
            "additionalProperties": false
        })
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        let report = match self.backend.qr().await {
            Ok(report) => report,
            Err(e) => return Ok(absorb_error(&e)),
        };

        match report.credential {
            Some(credential) => Ok(json!({
                "success": true,
                "qr_string": credential.raw,
                "qr_ascii": credential.ascii,
                "qr_image": credential.image_data_uri,
                "message": report.message,
            })),
            None => Ok(json!({
                "success": false,
                "message": report.message,
            })),
        }
    }
}

// ── wait_for_connection ─────────────────────────────────────────────────────

/// Block (cooperatively) until the session authenticates or time runs out.
pub struct WaitForConnectionTool {
    backend: Arc<dyn WhatsAppBackend>,
    default_timeout_secs: u64,
}

impl WaitForConnectionTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, default_timeout_secs: u64) -> Self {
        Self {
            backend,
            default_timeout_secs,
        }
    }
}

#[async_trait]
impl AgentTool for WaitForConnectionTool {
    fn name(&self) -> &str {
        "wait_for_connection"
    }

    fn description(&self) -> &str {
        "Wait for WhatsApp to become connected, polling the bridge until it \
         reports an authenticated session or the timeout elapses. A timeout \
         is a normal outcome (success=false, status=\"timeout\"), not an \
         error."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timeout_seconds": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 600,
                    "description": "How long to wait before giving up (default 60)"
                }
            },
            "required": [],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let timeout = u64::from(u32_or(
            &params,
            "timeout_seconds",
            u32::try_from(self.default_timeout_secs).unwrap_or(60),
        ));

        match self
            .backend
            .wait_for_connection(Duration::from_secs(timeout))
            .await
        {
            Ok(outcome) => Ok(serde_json::to_value(&outcome)?),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── reauthenticate ──────────────────────────────────────────────────────────

/// Force a fresh pairing cycle.
pub struct ReauthenticateTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl ReauthenticateTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for ReauthenticateTool {
    fn name(&self) -> &str {
        "reauthenticate"
    }

    fn description(&self) -> &str {
        "Drop the current WhatsApp session and trigger a new pairing. Fetch \
         a fresh QR code with get_qr or get_status afterwards."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": [],
            "additionalProperties": false
        })
    }

    async fn execute(&self, _params: Value) -> Result<Value> {
        match self.backend.reauthenticate().await {
            Ok(ack) => Ok(json!({ "success": ack.success, "message": ack.message })),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use gangway_backend::MockBackend;

    use super::*;

    fn mock() -> Arc<dyn WhatsAppBackend> {
        Arc::new(MockBackend::new())
    }

    #[tokio::test]
    async fn get_status_shape_is_stable() {
        let tool = GetStatusTool::new(mock());
        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["connected"], true);
        assert_eq!(result["bridge_running"], true);
        assert!(result["phone_number"].is_string());
        // Connected session never carries a QR code.
        assert!(result.get("qr_code").is_none());
    }

    #[tokio::test]
    async fn get_qr_returns_all_three_renderings() {
        let tool = GetQrTool::new(mock());
        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result["success"], true);
        assert!(result["qr_string"].as_str().unwrap().starts_with("2@"));
        assert!(result["qr_ascii"].as_str().unwrap().contains('█'));
        assert!(
            result["qr_image"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }

    #[tokio::test]
    async fn wait_serializes_the_outcome_contract() {
        let tool = WaitForConnectionTool::new(mock(), 60);
        let result = tool.execute(json!({"timeout_seconds": 3})).await.unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["status"], "connected");
        assert!(result["message"].is_string());
    }

    #[tokio::test]
    async fn reauthenticate_returns_ack() {
        let tool = ReauthenticateTool::new(mock());
        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result["success"], true);
    }
}
