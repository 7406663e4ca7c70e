//! The real backing: bridge HTTP calls plus read-only store queries.

use std::{path::Path, time::Duration};

use {async_trait::async_trait, tracing::info};

use {
    gangway_bridge::{
        BridgeClient, QrCredential, StatusResolver, StatusSource, WaitOutcome,
        wait_for_connection,
    },
    gangway_config::GangwayConfig,
    gangway_store::{
        ChatQuery, ChatRecord, Contact, MessageContext, MessageQuery, MessageRecord, MessageStore,
    },
};

use crate::{
    backend::WhatsAppBackend,
    error::Result,
    reports::{Ack, DownloadReport, QrReport, StatusReport},
};

/// Backend that talks to the deployed bridge and its message store.
pub struct LiveBackend {
    resolver: StatusResolver,
    store_db: std::path::PathBuf,
    poll_interval: Duration,
}

impl LiveBackend {
    /// Build from config.
    ///
    /// The one hard failure in the system: an endpoint URL that does not
    /// parse means the deployment is wrong, and starting up anyway would
    /// only defer the blow-up to the first tool call.
    pub fn from_config(cfg: &GangwayConfig) -> anyhow::Result<Self> {
        let client = BridgeClient::new(&cfg.bridge)
            .map_err(|e| anyhow::anyhow!("invalid bridge endpoint configuration: {e}"))?;
        Ok(Self {
            resolver: StatusResolver::new(client),
            store_db: cfg.store.messages_db.clone(),
            poll_interval: Duration::from_secs(cfg.wait.poll_interval_secs),
        })
    }

    pub(crate) fn client(&self) -> &BridgeClient {
        self.resolver.client()
    }

    /// The store is opened per call: the bridge creates the file on first
    /// run, possibly long after we started.
    async fn store(&self) -> Result<MessageStore> {
        Ok(MessageStore::open(&self.store_db).await?)
    }
}

#[async_trait]
impl WhatsAppBackend for LiveBackend {
    async fn status(&self) -> Result<StatusReport> {
        let (bridge_running, snapshot) = self.resolver.resolve_with_health().await;
        Ok(StatusReport {
            bridge_running,
            snapshot,
        })
    }

    async fn qr(&self) -> Result<QrReport> {
        let qr = self.client().qr().await?;
        match qr.qr_string {
            Some(raw) => {
                let render = gangway_qr::render(&raw).map_err(gangway_bridge::Error::from)?;
                Ok(QrReport {
                    credential: Some(QrCredential {
                        raw,
                        ascii: render.ascii,
                        image_data_uri: render.image_data_uri,
                    }),
                    message: "scan this QR code with WhatsApp on your phone".into(),
                })
            },
            None => Ok(QrReport {
                credential: None,
                message: qr.message.unwrap_or_else(|| {
                    "no QR code available; WhatsApp might already be connected".into()
                }),
            }),
        }
    }

    async fn wait_for_connection(&self, timeout: Duration) -> Result<WaitOutcome> {
        Ok(wait_for_connection(&self.resolver, timeout, self.poll_interval).await)
    }

    async fn reauthenticate(&self) -> Result<Ack> {
        let ack = self.client().reauth().await?;
        info!(success = ack.success, "requested bridge re-authentication");
        Ok(Ack {
            success: ack.success,
            message: ack
                .message
                .unwrap_or_else(|| "re-authentication triggered; fetch a fresh QR code".into()),
        })
    }

    async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        Ok(self.store().await?.search_contacts(query).await?)
    }

    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<MessageRecord>> {
        Ok(self.store().await?.list_messages(query).await?)
    }

    async fn list_chats(&self, query: &ChatQuery) -> Result<Vec<ChatRecord>> {
        Ok(self.store().await?.list_chats(query).await?)
    }

    async fn get_chat(
        &self,
        chat_jid: &str,
        include_last_message: bool,
    ) -> Result<Option<ChatRecord>> {
        Ok(self
            .store()
            .await?
            .get_chat(chat_jid, include_last_message)
            .await?)
    }

    async fn chats_for_contact(
        &self,
        jid: &str,
        limit: u32,
        page: u32,
    ) -> Result<Vec<ChatRecord>> {
        Ok(self.store().await?.chats_for_contact(jid, limit, page).await?)
    }

    async fn last_interaction(&self, jid: &str) -> Result<Option<MessageRecord>> {
        Ok(self.store().await?.last_interaction(jid).await?)
    }

    async fn message_context(
        &self,
        message_id: &str,
        before: u32,
        after: u32,
    ) -> Result<Option<MessageContext>> {
        Ok(self
            .store()
            .await?
            .message_context(message_id, before, after)
            .await?)
    }

    async fn send_text(&self, recipient: &str, message: &str) -> Result<Ack> {
        // Refuse early with a pointer at the pairing flow instead of letting
        // the bridge reject the send with something opaque.
        let snapshot = self.resolver.resolve().await;
        if !snapshot.is_connected() {
            return Ok(Ack::failed(format!(
                "WhatsApp is not connected ({}); scan the QR code first",
                snapshot.state()
            )));
        }

        let ack = self.client().send_text(recipient, message).await?;
        Ok(Ack {
            success: ack.success,
            message: ack
                .message
                .unwrap_or_else(|| format!("message sent to {recipient}")),
        })
    }

    async fn send_file(&self, recipient: &str, media_path: &Path) -> Result<Ack> {
        let snapshot = self.resolver.resolve().await;
        if !snapshot.is_connected() {
            return Ok(Ack::failed(format!(
                "WhatsApp is not connected ({}); scan the QR code first",
                snapshot.state()
            )));
        }

        let ack = self.client().send_media(recipient, media_path).await?;
        Ok(Ack {
            success: ack.success,
            message: ack
                .message
                .unwrap_or_else(|| format!("file sent to {recipient}")),
        })
    }

    async fn send_audio(&self, recipient: &str, media_path: &Path) -> Result<Ack> {
        let snapshot = self.resolver.resolve().await;
        if !snapshot.is_connected() {
            return Ok(Ack::failed(format!(
                "WhatsApp is not connected ({}); scan the QR code first",
                snapshot.state()
            )));
        }

        let ack = self.client().send_audio(recipient, media_path).await?;
        Ok(Ack {
            success: ack.success,
            message: ack
                .message
                .unwrap_or_else(|| format!("voice note sent to {recipient}")),
        })
    }

    async fn download_media(&self, message_id: &str, chat_jid: &str) -> Result<DownloadReport> {
        let ack = self.client().download_media(message_id, chat_jid).await?;
        match ack.file_path {
            Some(file_path) => Ok(DownloadReport {
                success: true,
                message: format!("media downloaded to {file_path}"),
                file_path: Some(file_path),
            }),
            None => Ok(DownloadReport {
                success: false,
                file_path: None,
                message: ack
                    .message
                    .unwrap_or_else(|| "bridge did not return a file path".into()),
            }),
        }
    }
}
