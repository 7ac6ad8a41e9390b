use thiserror::Error;

/// User-visible (400) failures. A closed sum type so handlers can test
/// membership exhaustively instead of string-matching a generic error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogicError {
    #[error("amount must be greater than zero")]
    ValidationAmount,

    #[error("the requested wallet with id = {0}, doesn't exist")]
    WalletDoesntExist(i32),

    #[error("the requested ticker with name = {0}, doesn't exist")]
    TickerDoesntExist(String),

    #[error("there are not enough {ticker}'s on the wallet with id = {wallet_id} to be debited")]
    NotEnoughCoins { wallet_id: i32, ticker: String },

    #[error("no such operation: {0}")]
    UnknownOperation(String),

    #[error("{0}")]
    BadRequest(String),
}

/// Everything the repository can fail with. System errors surface raw error
/// text to the caller; logic errors surface a user-meaningful message.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Logic(#[from] LogicError),

    #[error("{0}")]
    System(String),
}

impl RepositoryError {
    /// Capability check used by handlers to classify an outcome as a 400
    /// (`Some`) or a 500 (`None`).
    pub fn as_logic(&self) -> Option<&LogicError> {
        match self {
            RepositoryError::Logic(e) => Some(e),
            RepositoryError::System(_) => None,
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::System(err.to_string())
    }
}
