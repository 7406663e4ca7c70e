//! Deterministic rendering of WhatsApp pairing strings as QR symbols.
//!
//! The bridge hands out a one-time pairing string; this crate turns it into
//! the two disposable representations the tools expose: a terminal-friendly
//! ASCII matrix and a `data:image/png;base64,…` URI. Both are pure functions
//! of the input and are regenerated on every fetch — the underlying string
//! expires and rotates on the bridge's schedule, so caching a render would
//! only ever serve a stale credential.

mod render;

pub use render::{QrRender, RenderError, render};
