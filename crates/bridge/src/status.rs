//! One authoritative answer to "can we talk to WhatsApp right now?".

use {
    async_trait::async_trait,
    serde::Serialize,
    tracing::{debug, warn},
};

use crate::{client::BridgeClient, error::Result};

/// Where the session stands. Derived, never stored — recomputed from the
/// bridge's live answers on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Bridge down, or up with no session and no pairing offer.
    Disconnected,
    /// A pairing credential is outstanding, waiting for a phone to scan it.
    Pending,
    /// Authenticated session.
    Connected,
    /// The bridge explicitly reported the previous pairing window as expired.
    Expired,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => f.write_str("disconnected"),
            Self::Pending => f.write_str("pending"),
            Self::Connected => f.write_str("connected"),
            Self::Expired => f.write_str("expired"),
        }
    }
}

/// A pairing credential plus its two disposable renderings.
#[derive(Debug, Clone, Serialize)]
pub struct QrCredential {
    /// The authoritative one-time secret issued by the bridge.
    pub raw: String,
    /// Terminal rendering, regenerated on every fetch.
    pub ascii: String,
    /// `data:image/png;base64,…`, regenerated on every fetch.
    pub image_data_uri: String,
}

/// Snapshot of the connection, built fresh per request and discarded.
///
/// Fields are private so the two invariants hold by construction rather than
/// by caller discipline: a QR credential exists exactly in [`Pending`], and a
/// phone number only in [`Connected`].
///
/// [`Pending`]: ConnectionState::Pending
/// [`Connected`]: ConnectionState::Connected
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    state: ConnectionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qr: Option<QrCredential>,
    message: String,
}

impl StatusSnapshot {
    #[must_use]
    pub fn disconnected(message: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            phone_number: None,
            qr: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn expired(message: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Expired,
            phone_number: None,
            qr: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn pending(qr: QrCredential) -> Self {
        Self {
            state: ConnectionState::Pending,
            phone_number: None,
            qr: Some(qr),
            message: "scan the QR code with WhatsApp on your phone".into(),
        }
    }

    #[must_use]
    pub fn connected(phone_number: Option<String>) -> Self {
        Self {
            state: ConnectionState::Connected,
            phone_number,
            qr: None,
            message: "WhatsApp is connected".into(),
        }
    }

    /// Replace the human-readable message, keeping the state payload intact.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    #[must_use]
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    #[must_use]
    pub fn qr(&self) -> Option<&QrCredential> {
        self.qr.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Anything that can produce a [`StatusSnapshot`].
///
/// The waiter polls through this seam so tests can drive it with scripted
/// state machines instead of a live bridge.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn resolve(&self) -> StatusSnapshot;
}

/// Combines the health probe, the bridge's status and QR endpoints, and the
/// QR renderer into one snapshot.
pub struct StatusResolver {
    client: BridgeClient,
}

impl StatusResolver {
    #[must_use]
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &BridgeClient {
        &self.client
    }

    /// Like [`resolve`](StatusSource::resolve), but also reports whether the
    /// health probe passed, for callers that surface "bridge running" as its
    /// own field.
    pub async fn resolve_with_health(&self) -> (bool, StatusSnapshot) {
        if !self.client.health().await {
            debug!("bridge health probe negative");
            return (
                false,
                StatusSnapshot::disconnected("WhatsApp bridge is not running"),
            );
        }

        let snapshot = match self.try_resolve().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "bridge reachable but status resolution failed");
                StatusSnapshot::disconnected(format!("failed to read bridge status: {e}"))
            },
        };
        (true, snapshot)
    }

    /// The part that may fail; errors are absorbed by [`resolve`].
    ///
    /// [`resolve`]: StatusSource::resolve
    async fn try_resolve(&self) -> Result<StatusSnapshot> {
        let status = self.client.status().await?;
        if status.connected {
            return Ok(StatusSnapshot::connected(status.phone_number));
        }

        let qr = self.client.qr().await?;
        if let Some(raw) = qr.qr_string {
            let render = gangway_qr::render(&raw)?;
            return Ok(StatusSnapshot::pending(QrCredential {
                raw,
                ascii: render.ascii,
                image_data_uri: render.image_data_uri,
            }));
        }

        if qr.session_expired() {
            let message = qr
                .message
                .unwrap_or_else(|| "pairing window expired, request a new QR code".into());
            return Ok(StatusSnapshot::expired(message));
        }

        let message = qr
            .message
            .unwrap_or_else(|| "no pairing string available yet".into());
        Ok(StatusSnapshot::disconnected(message))
    }
}

#[async_trait]
impl StatusSource for StatusResolver {
    /// Resolve the current connection state. Infallible by contract: any
    /// error past the health check is folded into a `disconnected` snapshot
    /// carrying the diagnostic.
    async fn resolve(&self) -> StatusSnapshot {
        self.resolve_with_health().await.1
    }
}
