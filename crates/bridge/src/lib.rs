//! HTTP client for the companion WhatsApp bridge process, and the
//! connection-state layer built on top of it.
//!
//! The bridge owns the actual protocol session; this crate owns deciding
//! whether it is reachable and authenticated. [`client::BridgeClient`] is the
//! single place outbound requests are built (base URL, basic auth, per-call
//! timeouts). [`status::StatusResolver`] turns the bridge's live answers into
//! one authoritative [`status::StatusSnapshot`], and [`waiter`] polls that
//! snapshot until a login completes or a budget runs out.

pub mod client;
pub mod error;
pub mod status;
pub mod types;
pub mod waiter;

pub use {
    client::BridgeClient,
    error::{Error, Result},
    status::{ConnectionState, QrCredential, StatusResolver, StatusSnapshot, StatusSource},
    waiter::{WaitOutcome, WaitStatus, wait_for_connection},
};
