//! The one interface every tool-facing capability is implemented against.

use std::{path::Path, time::Duration};

use async_trait::async_trait;

use gangway_store::{
    ChatQuery, ChatRecord, Contact, MessageContext, MessageQuery, MessageRecord,
};

use crate::{
    error::Result,
    reports::{Ack, DownloadReport, QrReport, StatusReport},
};

/// Backend seam for every WhatsApp capability gangway exposes.
///
/// Implementations: [`LiveBackend`](crate::live::LiveBackend) (bridge +
/// message store), [`MockBackend`](crate::mock::MockBackend) (deterministic
/// placeholders), and the router's unavailable state. Implement an operation
/// once here and it exists in all three tiers; nothing branches on backend
/// identity at a call site.
#[async_trait]
pub trait WhatsAppBackend: Send + Sync {
    // ── Connection ──────────────────────────────────────────────────────

    async fn status(&self) -> Result<StatusReport>;

    async fn qr(&self) -> Result<QrReport>;

    async fn wait_for_connection(&self, timeout: Duration) -> Result<gangway_bridge::WaitOutcome>;

    async fn reauthenticate(&self) -> Result<Ack>;

    // ── Message store reads ─────────────────────────────────────────────

    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>>;

    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<MessageRecord>>;

    async fn list_chats(&self, query: &ChatQuery) -> Result<Vec<ChatRecord>>;

    async fn get_chat(&self, chat_jid: &str, include_last_message: bool)
    -> Result<Option<ChatRecord>>;

    async fn chats_for_contact(&self, jid: &str, limit: u32, page: u32)
    -> Result<Vec<ChatRecord>>;

    async fn last_interaction(&self, jid: &str) -> Result<Option<MessageRecord>>;

    async fn message_context(
        &self,
        message_id: &str,
        before: u32,
        after: u32,
    ) -> Result<Option<MessageContext>>;

    // ── Bridge writes ───────────────────────────────────────────────────

    async fn send_text(&self, recipient: &str, message: &str) -> Result<Ack>;

    async fn send_file(&self, recipient: &str, media_path: &Path) -> Result<Ack>;

    async fn send_audio(&self, recipient: &str, media_path: &Path) -> Result<Ack>;

    async fn download_media(&self, message_id: &str, chat_jid: &str) -> Result<DownloadReport>;
}
