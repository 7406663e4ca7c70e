use gangway_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database file is not where config says it should be — usually the
    /// bridge has not started (it creates the store on first run).
    #[error("message store not found at {path}; is the WhatsApp bridge running?")]
    Missing { path: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{message}")]
    Message { message: String },
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

gangway_common::impl_context!();
