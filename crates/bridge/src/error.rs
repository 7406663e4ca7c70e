use gangway_common::FromMessage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// QR payload arrived but could not be rendered.
    #[error(transparent)]
    QrRender(#[from] gangway_qr::RenderError),

    /// The bridge answered with a non-success status.
    #[error("bridge returned HTTP {status}: {body}")]
    Bridge { status: u16, body: String },

    /// A local file needed for an upload does not exist or is unreadable.
    #[error("local file unavailable: {message}")]
    Resource { message: String },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource {
            message: message.into(),
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

gangway_common::impl_context!();
