use crate::domain::error::RepositoryError;
use crate::domain::types::WalletId;
use async_trait::async_trait;
use common::GetBalanceResponse;
use rust_decimal::Decimal;

/// The transactional core's single port. One implementation
/// (`PostgresRepository`) backs it in production; handlers and dispatch
/// logic are tested against `MockRepository`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    /// Provisioning operation: allocate a new wallet. Never called on the
    /// request-handling path (see `crate::testing`).
    async fn create_wallet(&self) -> Result<WalletId, RepositoryError>;

    /// Provisioning operation: register a new ticker by name.
    async fn create_ticker(&self, name: &str) -> Result<(), RepositoryError>;

    /// Credits `amount` (must already be validated positive) to
    /// `(wallet_id, ticker)`, creating the balance row if absent.
    async fn invoice(&self, wallet_id: i32, ticker: &str, amount: Decimal) -> Result<(), RepositoryError>;

    /// Debits `amount` from `(wallet_id, ticker)`. Fails with
    /// `LogicError::NotEnoughCoins` — recorded as an `Error` transaction row —
    /// if the balance is insufficient.
    async fn withdraw(&self, wallet_id: i32, ticker: &str, amount: Decimal) -> Result<(), RepositoryError>;

    /// Reads the actual and frozen balances for a wallet, keyed by ticker name.
    async fn get_balance(&self, wallet_id: i32) -> Result<GetBalanceResponse, RepositoryError>;
}
