//! Selects which backing serves each call.

use std::{path::Path, time::Duration};

use {async_trait::async_trait, tracing::debug};

use {
    gangway_config::{BackendMode, GangwayConfig},
    gangway_store::{
        ChatQuery, ChatRecord, Contact, MessageContext, MessageQuery, MessageRecord,
    },
};

use crate::{
    backend::WhatsAppBackend,
    error::{Error, Result},
    live::LiveBackend,
    mock::MockBackend,
    reports::{Ack, DownloadReport, QrReport, StatusReport},
};

/// The capability-negotiation layer in front of the two real backings.
///
/// Mode is a configuration value fixed at startup. In live mode, data-plane
/// calls (store reads, sends, downloads) consult the health probe and fall
/// back to the mock backing while the bridge is down, so callers always get
/// a shaped, labeled result. Connection-plane calls (status, QR, wait,
/// reauth) stay on the live backing regardless: their degraded output — a
/// truthful `disconnected` snapshot — is the thing callers are asking for.
pub struct FallbackRouter {
    mode: BackendMode,
    live: Option<LiveBackend>,
    mock: MockBackend,
}

impl FallbackRouter {
    /// Build the router for the configured mode.
    ///
    /// Only live mode can fail, and only on an unusable endpoint URL.
    pub fn from_config(cfg: &GangwayConfig) -> anyhow::Result<Self> {
        let live = match cfg.backend.mode {
            BackendMode::Live => Some(LiveBackend::from_config(cfg)?),
            BackendMode::Mock | BackendMode::Unavailable => None,
        };
        Ok(Self {
            mode: cfg.backend.mode,
            live,
            mock: MockBackend::new(),
        })
    }

    #[must_use]
    pub fn mode(&self) -> BackendMode {
        self.mode
    }

    /// The live backing, or `Unavailable` outside live mode.
    fn live(&self) -> Result<&LiveBackend> {
        match (self.mode, &self.live) {
            (BackendMode::Live, Some(live)) => Ok(live),
            _ => Err(Error::Unavailable),
        }
    }

    /// Connection-plane dispatch: live in live mode, mock in mock mode.
    fn connection_backend(&self) -> Result<&dyn WhatsAppBackend> {
        match self.mode {
            BackendMode::Live => Ok(self.live()?),
            BackendMode::Mock => Ok(&self.mock),
            BackendMode::Unavailable => Err(Error::Unavailable),
        }
    }

    /// Data-plane dispatch: one shared health check decides live vs mock.
    async fn data_backend(&self) -> Result<&dyn WhatsAppBackend> {
        match self.mode {
            BackendMode::Live => {
                let live = self.live()?;
                if live.client().health().await {
                    Ok(live)
                } else {
                    debug!("bridge unhealthy, serving mock results");
                    Ok(&self.mock)
                }
            },
            BackendMode::Mock => Ok(&self.mock),
            BackendMode::Unavailable => Err(Error::Unavailable),
        }
    }
}

#[async_trait]
impl WhatsAppBackend for FallbackRouter {
    async fn status(&self) -> Result<StatusReport> {
        self.connection_backend()?.status().await
    }

    async fn qr(&self) -> Result<QrReport> {
        self.connection_backend()?.qr().await
    }

    async fn wait_for_connection(&self, timeout: Duration) -> Result<gangway_bridge::WaitOutcome> {
        self.connection_backend()?.wait_for_connection(timeout).await
    }

    async fn reauthenticate(&self) -> Result<Ack> {
        self.connection_backend()?.reauthenticate().await
    }

    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        self.data_backend().await?.search_contacts(query).await
    }

    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<MessageRecord>> {
        self.data_backend().await?.list_messages(query).await
    }

    async fn list_chats(&self, query: &ChatQuery) -> Result<Vec<ChatRecord>> {
        self.data_backend().await?.list_chats(query).await
    }

    async fn get_chat(
        &self,
        chat_jid: &str,
        include_last_message: bool,
    ) -> Result<Option<ChatRecord>> {
        self.data_backend()
            .await?
            .get_chat(chat_jid, include_last_message)
            .await
    }

    async fn chats_for_contact(
        &self,
        jid: &str,
        limit: u32,
        page: u32,
    ) -> Result<Vec<ChatRecord>> {
        self.data_backend()
            .await?
            .chats_for_contact(jid, limit, page)
            .await
    }

    async fn last_interaction(&self, jid: &str) -> Result<Option<MessageRecord>> {
        self.data_backend().await?.last_interaction(jid).await
    }

    async fn message_context(
        &self,
        message_id: &str,
        before: u32,
        after: u32,
    ) -> Result<Option<MessageContext>> {
        self.data_backend()
            .await?
            .message_context(message_id, before, after)
            .await
    }

    async fn send_text(&self, recipient: &str, message: &str) -> Result<Ack> {
        self.data_backend().await?.send_text(recipient, message).await
    }

    async fn send_file(&self, recipient: &str, media_path: &Path) -> Result<Ack> {
        self.data_backend().await?.send_file(recipient, media_path).await
    }

    async fn send_audio(&self, recipient: &str, media_path: &Path) -> Result<Ack> {
        self.data_backend().await?.send_audio(recipient, media_path).await
    }

    async fn download_media(&self, message_id: &str, chat_jid: &str) -> Result<DownloadReport> {
        self.data_backend()
            .await?
            .download_media(message_id, chat_jid)
            .await
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use {gangway_bridge::ConnectionState, gangway_config::GangwayConfig};

    use super::*;

    fn config(mode: BackendMode, url: &str) -> GangwayConfig {
        let mut cfg = GangwayConfig::default();
        cfg.backend.mode = mode;
        cfg.bridge.base_url = url.to_string();
        cfg
    }

    #[tokio::test]
    async fn unavailable_mode_reports_explicitly_everywhere() {
        let router =
            FallbackRouter::from_config(&config(BackendMode::Unavailable, "http://localhost:1"))
                .unwrap();

        let err = router.status().await.unwrap_err();
        assert!(err.to_string().contains("not available"));
        assert!(router.search_contacts("x").await.is_err());
        assert!(router.send_text("x", "y").await.is_err());
        assert!(router.download_media("m", "c").await.is_err());
    }

    #[tokio::test]
    async fn mock_mode_serves_placeholders_without_a_bridge() {
        let router =
            FallbackRouter::from_config(&config(BackendMode::Mock, "http://localhost:1")).unwrap();

        let status = router.status().await.unwrap();
        assert_eq!(status.snapshot.state(), ConnectionState::Connected);

        let contacts = router.search_contacts("ada").await.unwrap();
        assert!(contacts[0].name.as_ref().unwrap().starts_with("[mock]"));
    }

    #[tokio::test]
    async fn live_mode_degrades_data_calls_to_mock_when_bridge_is_down() {
        // Nothing is listening on this address.
        let router =
            FallbackRouter::from_config(&config(BackendMode::Live, "http://127.0.0.1:1")).unwrap();

        let ack = router.send_text("15551234567@s.whatsapp.net", "hi").await.unwrap();
        assert!(ack.message.starts_with("[mock]"));

        let chats = router.list_chats(&ChatQuery::default()).await.unwrap();
        assert_eq!(chats[0].name.as_deref(), Some("Mock Chat"));
    }

    #[tokio::test]
    async fn live_mode_status_reports_truthful_degradation() {
        let router =
            FallbackRouter::from_config(&config(BackendMode::Live, "http://127.0.0.1:1")).unwrap();

        let status = router.status().await.unwrap();
        assert!(!status.bridge_running);
        assert_eq!(status.snapshot.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn live_mode_uses_real_data_when_bridge_is_healthy() {
        let mut server = mockito::Server::new_async().await;
        let _health = server
            .mock("GET", "/health")
            .with_status(200)
            .expect_at_least(1)
            .create_async()
            .await;
        let _status = server
            .mock("GET", "/api/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"connected": true, "phone_number": "+15550009999"}"#)
            .create_async()
            .await;
        let _send = server
            .mock("POST", "/api/send")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success": true, "message": "delivered"}"#)
            .create_async()
            .await;

        let router =
            FallbackRouter::from_config(&config(BackendMode::Live, &server.url())).unwrap();
        let ack = router.send_text("15551234567@s.whatsapp.net", "hi").await.unwrap();
        assert!(ack.success);
        assert_eq!(ack.message, "delivered");
    }
}
