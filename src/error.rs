use crate::domain::coins::Coins;
use crate::domain::tag::TagId;
use thiserror::Error;

/// Failure raised by an outbound adapter (ownership store or ledger).
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("ownership store failure: {0}")]
    Store(String),
    #[error("ledger failure: {0}")]
    Ledger(String),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for AdapterError {
    fn from(err: rocksdb::Error) -> Self {
        Self::Store(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("tag {0} does not exist")]
    NotFound(TagId),
    #[error("tag {0} is already owned")]
    AlreadyOwned(TagId),
    #[error("no tag owned")]
    NoTag,
    #[error("insufficient funds, {deficit} more needed")]
    InsufficientFunds { deficit: Coins },
    #[error("adapter failure: {0}")]
    AdapterFailure(#[from] AdapterError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ShopError {
    /// Validation failures reject a transaction before anything is mutated.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::AlreadyOwned(_) | Self::NoTag | Self::InsufficientFunds { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;
