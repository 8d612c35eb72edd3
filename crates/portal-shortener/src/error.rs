use portal_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Outcomes of the encode and decode flows other than success.
///
/// The messages of `InvalidUrl` and `NotFound` are shown to clients as is.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("Your url <{0}> is invalid")]
    InvalidUrl(String),
    #[error("URL <{0}> is not found")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(
        #[from]
        #[source]
        StorageError,
    ),
}
