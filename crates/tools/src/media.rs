//! Media retrieval.

use std::sync::Arc;

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

/// Ask the bridge to materialize a message's media on disk.
pub struct DownloadMediaTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl DownloadMediaTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for DownloadMediaTool {
    fn name(&self) -> &str {
        "download_media"
    }

    fn description(&self) -> &str {
        "Download the media attached to a WhatsApp message. The bridge \
         writes the file into its media store and the local path comes back \
         as `file_path`."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message_id": {
                    "type": "string",
                    "minLength": 1,
                    "description": "ID of the message carrying the media"
                },
                "chat_jid": {
                    "type": "string",
                    "minLength": 5,
                    "description": "JID of the chat the message belongs to"
                }
            },
            "required": ["message_id", "chat_jid"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let message_id = match require_str(&params, "message_id") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };
        let chat_jid = match require_str(&params, "chat_jid") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };

        match self.backend.download_media(message_id, chat_jid).await {
            Ok(report) => {
                let mut result = json!({
                    "success": report.success,
                    "message": report.message,
                });
                if let Some(path) = report.file_path {
                    result["file_path"] = json!(path);
                }
                Ok(result)
            },
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}
