#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The integration is not deployed at all. Deliberately loud: silently
    /// mocking a missing deployment hides an operator mistake.
    #[error(
        "WhatsApp integration is not available in this deployment; \
         set backend.mode to \"live\" or \"mock\""
    )]
    Unavailable,

    #[error(transparent)]
    Bridge(#[from] gangway_bridge::Error),

    #[error(transparent)]
    Store(#[from] gangway_store::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
