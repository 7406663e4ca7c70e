//! Outbound message tools. Pure passthrough: validate, forward, reshape.

use std::{path::Path, sync::Arc};

use {
    anyhow::Result,
    async_trait::async_trait,
    serde_json::{Value, json},
};

use gangway_backend::WhatsAppBackend;

use crate::{
    outcome::{absorb_error, require_str},
    registry::AgentTool,
};

// ── send_message ────────────────────────────────────────────────────────────

/// Text message to a contact or group.
pub struct SendMessageTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl SendMessageTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for SendMessageTool {
    fn name(&self) -> &str {
        "send_message"
    }

    fn description(&self) -> &str {
        "Send a WhatsApp text message to a person or group. Refuses with a \
         structured result (not an error) while no session is authenticated."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "minLength": 5,
                    "maxLength": 100,
                    "description": "Recipient JID ('<number>@s.whatsapp.net' or '<id>@g.us')"
                },
                "message": {
                    "type": "string",
                    "minLength": 1,
                    "maxLength": 4096,
                    "description": "Text to send"
                }
            },
            "required": ["recipient", "message"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let recipient = match require_str(&params, "recipient") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };
        let message = match require_str(&params, "message") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };

        match self.backend.send_text(recipient, message).await {
            Ok(ack) => Ok(json!({ "success": ack.success, "message": ack.message })),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── send_file ───────────────────────────────────────────────────────────────

/// Media file (image, video, document) to a contact or group.
pub struct SendFileTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl SendFileTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for SendFileTool {
    fn name(&self) -> &str {
        "send_file"
    }

    fn description(&self) -> &str {
        "Send a local file (image, video, document) via WhatsApp. A missing \
         file is reported as a failed result, not an error."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "minLength": 5,
                    "maxLength": 100,
                    "description": "Recipient JID"
                },
                "media_path": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Absolute path to the file to send"
                }
            },
            "required": ["recipient", "media_path"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let recipient = match require_str(&params, "recipient") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };
        let media_path = match require_str(&params, "media_path") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };

        match self
            .backend
            .send_file(recipient, Path::new(media_path))
            .await
        {
            Ok(ack) => Ok(json!({ "success": ack.success, "message": ack.message })),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── send_audio_message ──────────────────────────────────────────────────────

/// Voice note (push-to-talk) to a contact or group.
pub struct SendAudioMessageTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl SendAudioMessageTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for SendAudioMessageTool {
    fn name(&self) -> &str {
        "send_audio_message"
    }

    fn description(&self) -> &str {
        "Send a local audio file as a WhatsApp voice note (PTT). Use \
         send_file instead to deliver audio as a plain document."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "minLength": 5,
                    "maxLength": 100,
                    "description": "Recipient JID"
                },
                "media_path": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Absolute path to the audio file"
                }
            },
            "required": ["recipient", "media_path"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let recipient = match require_str(&params, "recipient") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };
        let media_path = match require_str(&params, "media_path") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };

        match self
            .backend
            .send_audio(recipient, Path::new(media_path))
            .await
        {
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

    #[tokio::test]
    async fn send_message_validates_both_params() {
        let tool = SendMessageTool::new(Arc::new(MockBackend::new()));

        let no_recipient = tool.execute(json!({"message": "hi"})).await.unwrap();
        assert_eq!(no_recipient["success"], false);

        let no_message = tool
            .execute(json!({"recipient": "x@s.whatsapp.net"}))
            .await
            .unwrap();
        assert_eq!(no_message["success"], false);

        let ok = tool
            .execute(json!({"recipient": "x@s.whatsapp.net", "message": "hi"}))
            .await
            .unwrap();
        assert_eq!(ok["success"], true);
    }

    #[tokio::test]
    async fn send_file_and_audio_return_acks() {
        let file_tool = SendFileTool::new(Arc::new(MockBackend::new()));
        let result = file_tool
            .execute(json!({"recipient": "x@s.whatsapp.net", "media_path": "/tmp/p.jpg"}))
            .await
            .unwrap();
        assert_eq!(result["success"], true);

        let audio_tool = SendAudioMessageTool::new(Arc::new(MockBackend::new()));
        let result = audio_tool
            .execute(json!({"recipient": "x@s.whatsapp.net", "media_path": "/tmp/v.ogg"}))
            .await
            .unwrap();
        assert_eq!(result["success"], true);
    }
}
