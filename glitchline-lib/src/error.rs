use thiserror::Error;

/// Process-level failures. Wire-level outcomes (`BAD-RQST-HDR` and friends)
/// are ordinary reply values, not errors — see `protocol::reply`.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
