#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    TransportError(#[from] TransportError),

    #[error("Encoding error: {0}")]
    EncodingError(#[source] serde_json::Error),

    #[error("Decoding error: {0}")]
    DecodingError(#[source] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The connection failed while the response body was being drained.
    #[error("Body read error: {0}")]
    Body(#[source] reqwest::Error),
}

pub type StdResult<T, E> = std::result::Result<T, E>;

pub type Result<T> = std::result::Result<T, Error>;

pub type TransportResult<T> = std::result::Result<T, TransportError>;
