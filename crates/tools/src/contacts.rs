//! Contact lookup.

use std::sync::Arc;

use {
    anyhow::Result,
    async_trait::async_trait,
    serde_json::{Value, json},
};

use gangway_backend::WhatsAppBackend;

use crate::{
    format::{Format, ResponseFormatter},
    outcome::{absorb_error, require_str},
    registry::AgentTool,
};

/// Search stored contacts by name or phone number.
pub struct SearchContactsTool {
    backend: Arc<dyn WhatsAppBackend>,
    formatter: ResponseFormatter,
}

impl SearchContactsTool {
    #[must_use]
    pub fn new(backend: Arc<dyn WhatsAppBackend>, formatter: ResponseFormatter) -> Self {
        Self { backend, formatter }
    }
}

#[async_trait]
impl AgentTool for SearchContactsTool {
    fn name(&self) -> &str {
        "search_contacts"
    }

    fn description(&self) -> &str {
        "Search WhatsApp contacts by name or phone number. Matches are \
         substring, case-insensitive, individual contacts only (groups are \
         chats, not contacts)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Name or phone number fragment to search for"
                },
                "response_format": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "description": "Output format (default markdown)"
                }
            },
            "required": ["query"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let query = match require_str(&params, "query") {
            Ok(q) => q,
            Err(fail) => return Ok(fail),
        };
        let format = Format::from_params(&params);

        match self.backend.search_contacts(query).await {
            Ok(contacts) => {
                let content = self.formatter.format(&json!(contacts), format);
                Ok(json!({
                    "success": true,
                    "message": format!("{} contact(s) matched '{query}'", contacts.len()),
                    "content": content,
                }))
            },
            Err(e) => Ok(absorb_error(&e)),
        }
    }
}
