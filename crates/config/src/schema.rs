//! Config schema types (bridge endpoint, message store, backend selection,
//! response formatting).

use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GangwayConfig {
    pub bridge: BridgeConfig,
    pub store: StoreConfig,
    pub backend: BackendSelection,
    pub format: FormatConfig,
    pub wait: WaitConfig,
}

/// Which backing implementation serves tool calls.
///
/// An explicit, testable configuration value — the backend is never chosen
/// by probing whether some module happens to be importable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Talk to the real bridge (degrades to mock results while it is down).
    #[default]
    Live,
    /// Always return deterministic placeholder results.
    Mock,
    /// The integration is not deployed; every call reports that explicitly.
    Unavailable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSelection {
    pub mode: BackendMode,
}

/// Connection details for the companion bridge process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base URL of the bridge's HTTP API.
    pub base_url: String,
    /// Optional HTTP basic-auth user.
    pub auth_user: Option<String>,
    /// Optional HTTP basic-auth password.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_pass: Option<Secret<String>>,
    /// Liveness probe timeout. Kept short: the probe runs before every
    /// operation in live mode.
    pub health_timeout_secs: u64,
    /// Timeout for status / QR / reauth calls.
    pub status_timeout_secs: u64,
    /// Timeout for text sends.
    pub send_timeout_secs: u64,
    /// Timeout for media uploads and downloads.
    pub media_timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            auth_user: None,
            auth_pass: None,
            health_timeout_secs: 2,
            status_timeout_secs: 5,
            send_timeout_secs: 10,
            media_timeout_secs: 30,
        }
    }
}

impl BridgeConfig {
    /// Basic-auth pair, if both halves are configured.
    #[must_use]
    pub fn basic_auth(&self) -> Option<(String, String)> {
        match (&self.auth_user, &self.auth_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.expose_secret().clone())),
            _ => None,
        }
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

/// Location of the message store the bridge maintains. Read-only from our
/// side; the schema belongs to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the bridge's `messages.db` SQLite file.
    pub messages_db: PathBuf,
    /// Directory the bridge downloads media into.
    pub media_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            messages_db: PathBuf::from("store/messages.db"),
            media_dir: PathBuf::from("store/media"),
        }
    }
}

/// Response formatting limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Hard ceiling on formatted tool output, in characters. The consumer is
    /// a language-model context window, not a terminal.
    pub max_chars: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { max_chars: 25_000 }
    }
}

/// Connection-wait polling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Delay between status polls while waiting for authentication.
    pub poll_interval_secs: u64,
    /// Default overall wait budget when the caller does not pass one.
    pub default_timeout_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
            default_timeout_secs: 60,
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bridge_contract() {
        let cfg = GangwayConfig::default();
        assert_eq!(cfg.bridge.base_url, "http://localhost:8080");
        assert_eq!(cfg.bridge.health_timeout_secs, 2);
        assert_eq!(cfg.bridge.status_timeout_secs, 5);
        assert_eq!(cfg.bridge.send_timeout_secs, 10);
        assert_eq!(cfg.bridge.media_timeout_secs, 30);
        assert_eq!(cfg.format.max_chars, 25_000);
        assert_eq!(cfg.backend.mode, BackendMode::Live);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: GangwayConfig = toml::from_str(
            r#"
            [bridge]
            base_url = "http://10.0.0.5:9090"

            [backend]
            mode = "mock"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bridge.base_url, "http://10.0.0.5:9090");
        assert_eq!(cfg.bridge.send_timeout_secs, 10);
        assert_eq!(cfg.backend.mode, BackendMode::Mock);
        assert_eq!(cfg.wait.poll_interval_secs, 2);
    }

    #[test]
    fn basic_auth_requires_both_halves() {
        let mut cfg = BridgeConfig::default();
        assert!(cfg.basic_auth().is_none());
        cfg.auth_user = Some("bridge".into());
        assert!(cfg.basic_auth().is_none());
        cfg.auth_pass = Some(Secret::new("hunter2".into()));
        let (user, pass) = cfg.basic_auth().unwrap();
        assert_eq!(user, "bridge");
        assert_eq!(pass, "hunter2");
    }

    #[test]
    fn auth_pass_round_trips_through_toml() {
        let mut cfg = GangwayConfig::default();
        cfg.bridge.auth_pass = Some(Secret::new("hunter2".into()));
        let out = toml::to_string(&cfg).unwrap();
        let back: GangwayConfig = toml::from_str(&out).unwrap();
        assert_eq!(back.bridge.auth_pass.unwrap().expose_secret(), "hunter2");
    }
}
