//! Configuration loading and schema for gangway.
//!
//! Config file: `gangway.toml`, searched in `./` then `~/.config/gangway/`.
//! Every value has a sensible default, so a missing file is not an error.
//! Supports `${ENV_VAR}` substitution in string values, plus a small set of
//! `GANGWAY_*` environment overrides applied after parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{apply_env_overrides, config_dir, discover_and_load, load_config},
    schema::{
        BackendMode, BackendSelection, BridgeConfig, FormatConfig, GangwayConfig, StoreConfig,
        WaitConfig,
    },
};
