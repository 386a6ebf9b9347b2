//! Error kinds reported by the prompt client.
//!
//! The `Display` output of each variant is exactly the text shown in the
//! page's status element.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The service answered with a non-2xx status.
    #[error("Error {status}: {body}")]
    Server { status: u16, body: String },

    /// The request never completed, or the response could not be decoded.
    #[error("Fetch error: {0}")]
    Transport(String),

    /// The page lacks an element the client drives.
    #[error("Missing page element: {0}")]
    MissingElement(&'static str),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}
