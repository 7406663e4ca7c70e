use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{
    env_subst::substitute_env,
    schema::{BackendMode, GangwayConfig},
};

/// Standard config file name.
const CONFIG_FILENAME: &str = "gangway.toml";

/// Load config from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<GangwayConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./gangway.toml` (project-local)
/// 2. `~/.config/gangway/gangway.toml` (user-global)
///
/// Returns `GangwayConfig::default()` (plus env overrides) if no config file
/// is found or the file fails to parse.
pub fn discover_and_load() -> GangwayConfig {
    let mut cfg = if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                GangwayConfig::default()
            },
        }
    } else {
        debug!("no config file found, using defaults");
        GangwayConfig::default()
    };
    apply_env_overrides(&mut cfg);
    cfg
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    let p = PathBuf::from(CONFIG_FILENAME);
    if p.exists() {
        return Some(p);
    }

    // User-global: ~/.config/gangway/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "gangway") {
        let p = dirs.config_dir().join(CONFIG_FILENAME);
        if p.exists() {
            return Some(p);
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/gangway/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "gangway").map(|d| d.config_dir().to_path_buf())
}

/// Apply `GANGWAY_*` environment overrides on top of a parsed config.
///
/// These exist so a containerized deployment can point at a bridge without
/// shipping a config file.
pub fn apply_env_overrides(cfg: &mut GangwayConfig) {
    if let Ok(url) = std::env::var("GANGWAY_BRIDGE_URL") {
        cfg.bridge.base_url = url;
    }
    if let Ok(user) = std::env::var("GANGWAY_AUTH_USER")
        && !user.is_empty()
    {
        cfg.bridge.auth_user = Some(user);
    }
    if let Ok(pass) = std::env::var("GANGWAY_AUTH_PASS")
        && !pass.is_empty()
    {
        cfg.bridge.auth_pass = Some(Secret::new(pass));
    }
    if let Ok(db) = std::env::var("GANGWAY_MESSAGES_DB") {
        cfg.store.messages_db = PathBuf::from(db);
    }
    if let Ok(dir) = std::env::var("GANGWAY_MEDIA_DIR") {
        cfg.store.media_dir = PathBuf::from(dir);
    }
    if let Ok(mode) = std::env::var("GANGWAY_BACKEND") {
        match mode.as_str() {
            "live" => cfg.backend.mode = BackendMode::Live,
            "mock" => cfg.backend.mode = BackendMode::Mock,
            "unavailable" => cfg.backend.mode = BackendMode::Unavailable,
            other => warn!(mode = %other, "unknown GANGWAY_BACKEND value, keeping configured mode"),
        }
    }
}
