//! Message history tools.

use std::sync::Arc;

use {
    anyhow::Result,
    async_trait::async_trait,
    serde_json::{Value, json},
};

use {gangway_backend::WhatsAppBackend, gangway_store::MessageQuery};

use crate::{
    format::{Format, ResponseFormatter},
    outcome::{absorb_error, failure, opt_str, require_str, u32_or},
    registry::AgentTool,
};

// ── list_messages ───────────────────────────────────────────────────────────

/// Filtered, paginated message listing.
pub struct ListMessagesTool {
    backend: Arc<dyn WhatsAppBackend>,
    formatter: ResponseFormatter,
}

impl ListMessagesTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, formatter: ResponseFormatter) -> Self {
        Self { backend, formatter }
    }
}

#[async_trait]
impl AgentTool for ListMessagesTool {
    fn name(&self) -> &str {
        "list_messages"
    }

    fn description(&self) -> &str {
        "Get WhatsApp messages matching the given criteria. All filters are \
         optional and combine; results are newest first and paginated."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "after": {
                    "type": "string",
                    "description": "Only messages after this ISO-8601 timestamp"
                },
                "before": {
                    "type": "string",
                    "description": "Only messages before this ISO-8601 timestamp"
                },
                "sender_phone_number": {
                    "type": "string",
                    "description": "Only messages from this phone number"
                },
                "chat_jid": {
                    "type": "string",
                    "description": "Only messages in this chat"
                },
                "query": {
                    "type": "string",
                    "description": "Case-insensitive substring on message text"
                },
                "limit": { "type": "integer", "minimum": 1, "maximum": 200 },
                "page": { "type": "integer", "minimum": 0 },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output format (default markdown)"
                }
            },
            "required": [],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let query = MessageQuery {
            after: opt_str(&params, "after"),
            before: opt_str(&params, "before"),
            sender: opt_str(&params, "sender_phone_number"),
            chat_jid: opt_str(&params, "chat_jid"),
            query: opt_str(&params, "query"),
            limit: u32_or(&params, "limit", 20),
            page: u32_or(&params, "page", 0),
        };
        let format = Format::from_params(&params);

        match self.backend.list_messages(&query).await {
            Ok(records) => {
                let payload = match format {
                    Format::Json => json!(records),
                    Format::Markdown => {
                        if records.is_empty() {
                            json!("No messages found")
                        } else {
                            let lines: Vec<String> =
                                records.iter().map(|r| r.format_line()).collect();
                            json!(lines.join("\n"))
                        }
                    },
                };
                Ok(json!({
                    "success": true,
                    "message": format!("{} message(s)", records.len()),
                    "content": self.formatter.format(&payload, format),
                }))
            },
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── get_last_interaction ────────────────────────────────────────────────────

/// Most recent message involving a contact.
pub struct GetLastInteractionTool {
    backend: Arc<dyn WhatsAppBackend>,
}

impl GetLastInteractionTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AgentTool for GetLastInteractionTool {
    fn name(&self) -> &str {
        "get_last_interaction"
    }

    fn description(&self) -> &str {
        "Get the most recent WhatsApp message involving the given contact, \
         across direct and group chats."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "jid": {
                    "type": "string",
                    "minLength": 5,
                    "description": "Contact JID (e.g. '15551234567@s.whatsapp.net')"
                }
            },
            "required": ["jid"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let jid = match require_str(&params, "jid") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };

        match self.backend.last_interaction(jid).await {
            Ok(Some(record)) => Ok(json!({
                "success": true,
                "message": record.format_line(),
            })),
            Ok(None) => Ok(json!({
                "success": true,
                "message": "No interactions found",
            })),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── get_message_context ─────────────────────────────────────────────────────

/// A message with the conversation around it.
pub struct GetMessageContextTool {
    backend: Arc<dyn WhatsAppBackend>,
    formatter: ResponseFormatter,
}

impl GetMessageContextTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, formatter: ResponseFormatter) -> Self {
        Self { backend, formatter }
    }
}

#[async_trait]
impl AgentTool for GetMessageContextTool {
    fn name(&self) -> &str {
        "get_message_context"
    }

    fn description(&self) -> &str {
        "Get the messages surrounding a specific WhatsApp message, in \
         chronological order, to recover the thread of a conversation."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message_id": {
                    "type": "string",
                    "minLength": 1,
                    "description": "ID of the target message"
                },
                "before": {
                    "type": "integer", "minimum": 0, "maximum": 50,
                    "description": "Messages to include before the target (default 5)"
                },
                "after": {
                    "type": "integer", "minimum": 0, "maximum": 50,
                    "description": "Messages to include after the target (default 5)"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output format (default markdown)"
                }
            },
            "required": ["message_id"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let message_id = match require_str(&params, "message_id") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };
        let before = u32_or(&params, "before", 5);
        let after = u32_or(&params, "after", 5);
        let format = Format::from_params(&params);

        match self.backend.message_context(message_id, before, after).await {
            Ok(Some(context)) => {
                let content = self
                    .formatter
                    .format(&serde_json::to_value(&context)?, format);
                Ok(json!({
                    "success": true,
                    "message": format!(
                        "{} message(s) before, {} after",
                        context.before.len(),
                        context.after.len()
                    ),
                    "content": content,
                }))
            },
            Ok(None) => Ok(failure(format!("message not found: {message_id}"))),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}
