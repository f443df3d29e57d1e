//! Error types for medstock-client

use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Text shown to the user for any transport or decoding failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please try again.";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status and an `error` message
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request could not be sent or the connection failed
    #[error("HTTP error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body was not the expected JSON
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("invalid API base URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// The message a user should see for this error.
    ///
    /// Server-side validation messages are shown as-is; everything else collapses into a
    /// generic network message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(_) | ClientError::Decode(_) | ClientError::InvalidUrl(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
        }
    }
}
