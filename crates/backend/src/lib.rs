//! The tiered-degradation layer: one backend interface, three backings.
//!
//! Every capability the tools expose goes through [`WhatsAppBackend`]. The
//! trait has exactly three backings — [`LiveBackend`] against the real
//! bridge, [`MockBackend`] with deterministic placeholders, and an explicit
//! unavailable state — and [`FallbackRouter`] picks between them from one
//! configured [`BackendMode`](gangway_config::BackendMode) plus one shared
//! health probe. Earlier generations of this server grew three divergent
//! copies of this decision across independent modules, keyed on whether an
//! import happened to succeed; the router is the single replacement.

pub mod backend;
pub mod error;
pub mod live;
pub mod mock;
pub mod reports;
pub mod router;

pub use {
    backend::WhatsAppBackend,
    error::{Error, Result},
    live::LiveBackend,
    mock::MockBackend,
    reports::{Ack, DownloadReport, QrReport, StatusReport},
    router::FallbackRouter,
};
