//! Shared error plumbing used across all gangway crates.

pub mod error;

pub use error::FromMessage;
