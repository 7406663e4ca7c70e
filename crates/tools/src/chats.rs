//! Chat metadata tools.

use std::sync::Arc;

use {
    anyhow::Result,
    async_trait::async_trait,
    serde_json::{Value, json},
};

use {
    gangway_backend::WhatsAppBackend,
    gangway_store::{ChatQuery, ChatSort},
};

use crate::{
    format::{Format, ResponseFormatter},
    outcome::{absorb_error, bool_or, failure, opt_str, require_str, u32_or},
    registry::AgentTool,
};

// ── list_chats ──────────────────────────────────────────────────────────────

/// Paginated chat listing.
pub struct ListChatsTool {
    backend: Arc<dyn WhatsAppBackend>,
    formatter: ResponseFormatter,
}

impl ListChatsTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, formatter: ResponseFormatter) -> Self {
        Self { backend, formatter }
    }
}

#[async_trait]
impl AgentTool for ListChatsTool {
    fn name(&self) -> &str {
        "list_chats"
    }

    fn description(&self) -> &str {
        "List WhatsApp chats (direct and group), optionally filtered by name \
         or JID and joined with each chat's latest message."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Substring match on chat name or JID"
                },
                "limit": { "type": "integer", "minimum": 1, "maximum": 200 },
                "page": { "type": "integer", "minimum": 0 },
                "include_last_message": {
                    "type": "boolean",
                    "description": "Attach each chat's latest message (default true)"
                },
                "sort_by": {
                    "type": "string",
                    "enum": ["last_active", "name"],
                    "description": "Ordering (default last_active)"
                },
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
        let query = ChatQuery {
            query: opt_str(&params, "query"),
            limit: u32_or(&params, "limit", 20),
            page: u32_or(&params, "page", 0),
            include_last_message: bool_or(&params, "include_last_message", true),
            sort_by: opt_str(&params, "sort_by")
                .map(|s| ChatSort::parse(&s))
                .unwrap_or_default(),
        };
        let format = Format::from_params(&params);

        match self.backend.list_chats(&query).await {
            Ok(chats) => Ok(json!({
                "success": true,
                "message": format!("{} chat(s)", chats.len()),
                "content": self.formatter.format(&json!(chats), format),
            })),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── get_chat ────────────────────────────────────────────────────────────────

/// One chat by JID.
pub struct GetChatTool {
    backend: Arc<dyn WhatsAppBackend>,
    formatter: ResponseFormatter,
}

impl GetChatTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, formatter: ResponseFormatter) -> Self {
        Self { backend, formatter }
    }
}

#[async_trait]
impl AgentTool for GetChatTool {
    fn name(&self) -> &str {
        "get_chat"
    }

    fn description(&self) -> &str {
        "Get WhatsApp chat metadata by JID (use '<number>@s.whatsapp.net' \
         for direct chats, '<id>@g.us' for groups)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "chat_jid": {
                    "type": "string",
                    "minLength": 5,
                    "description": "Chat JID"
                },
                "include_last_message": {
                    "type": "boolean",
                    "description": "Attach the latest message (default true)"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output format (default markdown)"
                }
            },
            "required": ["chat_jid"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let chat_jid = match require_str(&params, "chat_jid") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };
        let include_last = bool_or(&params, "include_last_message", true);
        let format = Format::from_params(&params);

        match self.backend.get_chat(chat_jid, include_last).await {
            Ok(Some(chat)) => Ok(json!({
                "success": true,
                "message": format!("chat {chat_jid}"),
                "content": self.formatter.format(&json!(chat), format),
            })),
            Ok(None) => Ok(failure(format!("chat not found: {chat_jid}"))),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── get_direct_chat_by_contact ──────────────────────────────────────────────

/// Direct chat lookup by bare phone number.
pub struct GetDirectChatByContactTool {
    backend: Arc<dyn WhatsAppBackend>,
    formatter: ResponseFormatter,
}

impl GetDirectChatByContactTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, formatter: ResponseFormatter) -> Self {
        Self { backend, formatter }
    }
}

#[async_trait]
impl AgentTool for GetDirectChatByContactTool {
    fn name(&self) -> &str {
        "get_direct_chat_by_contact"
    }

    fn description(&self) -> &str {
        "Get the direct WhatsApp chat for a phone number, without needing \
         the full JID."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sender_phone_number": {
                    "type": "string",
                    "minLength": 5,
                    "description": "Phone number digits, no '+' (e.g. '15551234567')"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output format (default markdown)"
                }
            },
            "required": ["sender_phone_number"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let phone = match require_str(&params, "sender_phone_number") {
            Ok(v) => v,
            Err(fail) => return Ok(fail),
        };
        let jid = format!("{phone}@s.whatsapp.net");
        let format = Format::from_params(&params);

        match self.backend.get_chat(&jid, true).await {
            Ok(Some(chat)) => Ok(json!({
                "success": true,
                "message": format!("chat {jid}"),
                "content": self.formatter.format(&json!(chat), format),
            })),
            Ok(None) => Ok(failure(format!("no direct chat with {phone}"))),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}

// ── get_contact_chats ───────────────────────────────────────────────────────

/// Every chat a contact participates in.
pub struct GetContactChatsTool {
    backend: Arc<dyn WhatsAppBackend>,
    formatter: ResponseFormatter,
}

impl GetContactChatsTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, formatter: ResponseFormatter) -> Self {
        Self { backend, formatter }
    }
}

#[async_trait]
impl AgentTool for GetContactChatsTool {
    fn name(&self) -> &str {
        "get_contact_chats"
    }

    fn description(&self) -> &str {
        "List all WhatsApp chats (direct and group) involving the given \
         contact."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "jid": {
                    "type": "string",
                    "minLength": 5,
                    "description": "Contact JID or bare phone number"
                },
                "limit": { "type": "integer", "minimum": 1, "maximum": 200 },
                "page": { "type": "integer", "minimum": 0 },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output format (default markdown)"
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
        let limit = u32_or(&params, "limit", 20);
        let page = u32_or(&params, "page", 0);
        let format = Format::from_params(&params);

        match self.backend.chats_for_contact(jid, limit, page).await {
            Ok(chats) => Ok(json!({
                "success": true,
                "message": format!("{} chat(s) involve {jid}", chats.len()),
                "content": self.formatter.format(&json!(chats), format),
            })),
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}
