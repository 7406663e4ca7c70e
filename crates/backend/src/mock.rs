//! Deterministic placeholder backing.
//!
//! Served in two situations: `backend.mode = "mock"` deployments (demos,
//! integration tests of the hosting layer) and live-mode calls made while
//! the bridge is down. Every value is a fixed constant and every message is
//! prefixed `[mock]`, so a placeholder can never be mistaken for traffic,
//! and downstream formatting code sees the exact shapes the live backend
//! produces.

use std::{path::Path, time::Duration};

use async_trait::async_trait;

use {
    gangway_bridge::{QrCredential, StatusSnapshot, WaitOutcome, WaitStatus},
    gangway_store::{
        ChatQuery, ChatRecord, Contact, MessageContext, MessageQuery, MessageRecord,
    },
};

use crate::{
    backend::WhatsAppBackend,
    error::Result,
    reports::{Ack, DownloadReport, QrReport, StatusReport},
};

/// Fixed clock for every placeholder record. Mock output must be
/// byte-stable across calls, so the real clock never appears here.
pub const MOCK_TIMESTAMP: &str = "2024-01-01 00:00:00";
/// Phone number of the pretend session.
pub const MOCK_PHONE: &str = "+15550000000";
/// JID placeholder results are attributed to.
pub const MOCK_JID: &str = "15550000001@s.whatsapp.net";
/// Pairing string the mock QR flow renders.
const MOCK_PAIRING: &str = "2@mock-pairing-credential,mock-identity-key,mock-adv-secret";

/// Backend of fixed placeholder values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn message(&self, id: &str, content: &str) -> MessageRecord {
        MessageRecord {
            id: id.to_string(),
            timestamp: MOCK_TIMESTAMP.into(),
            sender: "15550000001".into(),
            chat_jid: MOCK_JID.into(),
            chat_name: Some("Mock Chat".into()),
            content: content.to_string(),
            is_from_me: false,
            media_type: None,
        }
    }

    fn chat(&self, jid: &str) -> ChatRecord {
        ChatRecord {
            jid: jid.to_string(),
            name: Some("Mock Chat".into()),
            last_active: Some(MOCK_TIMESTAMP.into()),
            last_message: Some("[mock] last message".into()),
            last_sender: Some("15550000001".into()),
            last_is_from_me: Some(false),
        }
    }
}

#[async_trait]
impl WhatsAppBackend for MockBackend {
    async fn status(&self) -> Result<StatusReport> {
        Ok(StatusReport {
            bridge_running: true,
            snapshot: StatusSnapshot::connected(Some(MOCK_PHONE.into()))
                .with_message("[mock] WhatsApp is connected"),
        })
    }

    async fn qr(&self) -> Result<QrReport> {
        // Render the fixed pairing string through the real renderer so the
        // mock exercises the same code path and shapes.
        let credential = gangway_qr::render(MOCK_PAIRING).ok().map(|r| QrCredential {
            raw: MOCK_PAIRING.into(),
            ascii: r.ascii,
            image_data_uri: r.image_data_uri,
        });
        Ok(QrReport {
            credential,
            message: "[mock] scanning this code pairs nothing".into(),
        })
    }

    async fn wait_for_connection(&self, _timeout: Duration) -> Result<WaitOutcome> {
        Ok(WaitOutcome {
            success: true,
            status: WaitStatus::Connected,
            message: "[mock] WhatsApp is now connected".into(),
            phone_number: Some(MOCK_PHONE.into()),
        })
    }

    async fn reauthenticate(&self) -> Result<Ack> {
        Ok(Ack::ok("[mock] re-authentication triggered"))
    }

    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        Ok(vec![Contact {
            jid: MOCK_JID.into(),
            name: Some(format!("[mock] contact matching '{query}'")),
            phone: "15550000001".into(),
        }])
    }

    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<MessageRecord>> {
        let label = query.query.as_deref().unwrap_or("all");
        Ok(vec![
            self.message("MOCK-MSG-1", &format!("[mock] message for query: {label}")),
        ])
    }

    async fn list_chats(&self, _query: &ChatQuery) -> Result<Vec<ChatRecord>> {
        Ok(vec![self.chat(MOCK_JID)])
    }

    async fn get_chat(
        &self,
        chat_jid: &str,
        _include_last_message: bool,
    ) -> Result<Option<ChatRecord>> {
        Ok(Some(self.chat(chat_jid)))
    }

    async fn chats_for_contact(
        &self,
        jid: &str,
        _limit: u32,
        _page: u32,
    ) -> Result<Vec<ChatRecord>> {
        Ok(vec![self.chat(jid)])
    }

    async fn last_interaction(&self, jid: &str) -> Result<Option<MessageRecord>> {
        Ok(Some(
            self.message("MOCK-MSG-1", &format!("[mock] last interaction with {jid}")),
        ))
    }

    async fn message_context(
        &self,
        message_id: &str,
        _before: u32,
        _after: u32,
    ) -> Result<Option<MessageContext>> {
        Ok(Some(MessageContext {
            message: self.message(message_id, "[mock] target message"),
            before: Vec::new(),
            after: Vec::new(),
        }))
    }

    async fn send_text(&self, recipient: &str, _message: &str) -> Result<Ack> {
        Ok(Ack::ok(format!("[mock] message sent to {recipient}")))
    }

    async fn send_file(&self, recipient: &str, media_path: &Path) -> Result<Ack> {
        Ok(Ack::ok(format!(
            "[mock] file {} sent to {recipient}",
            media_path.display()
        )))
    }

    async fn send_audio(&self, recipient: &str, media_path: &Path) -> Result<Ack> {
        Ok(Ack::ok(format!(
            "[mock] voice note {} sent to {recipient}",
            media_path.display()
        )))
    }

    async fn download_media(&self, message_id: &str, _chat_jid: &str) -> Result<DownloadReport> {
        Ok(DownloadReport {
            success: true,
            file_path: Some(format!("/tmp/mock_media_{message_id}.jpg")),
            message: "[mock] media downloaded".into(),
        })
    }
}
