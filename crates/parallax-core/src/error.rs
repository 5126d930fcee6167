use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Connection, timeout or body-read failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error ended a load attempt at the fetch stage.
    ///
    /// Network, HTTP and decode failures are all surfaced the same way to the
    /// user: the attempt is over and nothing is rendered.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::HttpStatus { .. } | Error::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
