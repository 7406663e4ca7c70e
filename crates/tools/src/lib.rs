//! Agent-callable tools over the WhatsApp backend.
//!
//! Each tool is a thin, uniformly-shaped wrapper: parse parameters, call one
//! [`WhatsAppBackend`](gangway_backend::WhatsAppBackend) operation, convert
//! whatever came back — data, degradation, or error — into a JSON object
//! with at least `{success, message}`. Nothing a tool returns is ever a raw
//! error; that guarantee is what keeps this catalog safe to grow.

pub mod chats;
pub mod contacts;
pub mod format;
pub mod media;
pub mod messages;
mod outcome;
pub mod registry;
pub mod send;
pub mod status;

use std::sync::Arc;

use {gangway_backend::WhatsAppBackend, gangway_config::GangwayConfig};

pub use {
    format::{Format, ResponseFormatter},
    registry::{AgentTool, ToolRegistry},
};

/// Build the full tool catalog against one backend.
#[must_use]
pub fn default_registry(backend: Arc<dyn WhatsAppBackend>, cfg: &GangwayConfig) -> ToolRegistry {
    let formatter = ResponseFormatter::from_config(&cfg.format);
    let mut registry = ToolRegistry::new();

    registry.register(Box::new(status::GetStatusTool::new(Arc::clone(&backend))));
    registry.register(Box::new(status::GetQrTool::new(Arc::clone(&backend))));
    registry.register(Box::new(status::WaitForConnectionTool::new(
        Arc::clone(&backend),
        cfg.wait.default_timeout_secs,
    )));
    registry.register(Box::new(status::ReauthenticateTool::new(Arc::clone(
        &backend,
    ))));

    registry.register(Box::new(contacts::SearchContactsTool::new(
        Arc::clone(&backend),
        formatter.clone(),
    )));

    registry.register(Box::new(messages::ListMessagesTool::new(
        Arc::clone(&backend),
        formatter.clone(),
    )));
    registry.register(Box::new(messages::GetLastInteractionTool::new(Arc::clone(
        &backend,
    ))));
    registry.register(Box::new(messages::GetMessageContextTool::new(
        Arc::clone(&backend),
        formatter.clone(),
    )));

    registry.register(Box::new(chats::ListChatsTool::new(
        Arc::clone(&backend),
        formatter.clone(),
    )));
    registry.register(Box::new(chats::GetChatTool::new(
        Arc::clone(&backend),
        formatter.clone(),
    )));
    registry.register(Box::new(chats::GetDirectChatByContactTool::new(
        Arc::clone(&backend),
        formatter.clone(),
    )));
    registry.register(Box::new(chats::GetContactChatsTool::new(
        Arc::clone(&backend),
        formatter,
    )));

    registry.register(Box::new(send::SendMessageTool::new(Arc::clone(&backend))));
    registry.register(Box::new(send::SendFileTool::new(Arc::clone(&backend))));
    registry.register(Box::new(send::SendAudioMessageTool::new(Arc::clone(
        &backend,
    ))));

    registry.register(Box::new(media::DownloadMediaTool::new(backend)));

    registry
}
