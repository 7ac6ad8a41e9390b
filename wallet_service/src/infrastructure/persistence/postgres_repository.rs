use crate::domain::entities::TransactionStatus;
use crate::domain::error::{LogicError, RepositoryError};
use crate::domain::repository::Repository;
use crate::domain::types::WalletId;
use crate::infrastructure::persistence::models::TickerAmountRow;
use async_trait::async_trait;
use common::{decimal_to_f64, GetBalanceResponse};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;

/// Repository backed by PostgreSQL. Every public operation opens exactly the
/// transactions it needs: a read-only preflight, then a single read-write
/// transaction that carries the `Created -> Success` transition to
/// completion atomically.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rolls a transaction back after `err`, logging (but not returning) a
    /// rollback failure on top of it: the original query failure is always
    /// what gets surfaced to the caller.
    async fn rollback_after(tx: Transaction<'_, Postgres>, err: RepositoryError) -> RepositoryError {
        if let Err(rollback_err) = tx.rollback().await {
            tracing::warn!(error = %rollback_err, "rollback failed after a prior error");
        }
        err
    }

    /// Resolves `ticker` to its id inside a read-only transaction, failing
    /// with a logic error if either the wallet or the ticker is absent.
    #[tracing::instrument(skip(self))]
    async fn check_wallet_and_ticker(&self, wallet_id: i32, ticker: &str) -> Result<i32, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let wallet_row = sqlx::query_scalar::<_, i32>("SELECT wallet_id FROM wallets WHERE wallet_id = $1")
            .bind(wallet_id)
            .fetch_optional(&mut *tx)
            .await;
        let wallet_row = match wallet_row {
            Ok(row) => row,
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        };
        if wallet_row.is_none() {
            return Err(Self::rollback_after(tx, LogicError::WalletDoesntExist(wallet_id).into()).await);
        }

        let ticker_row = sqlx::query_scalar::<_, i32>("SELECT ticker_id FROM tickers WHERE name = $1")
            .bind(ticker)
            .fetch_optional(&mut *tx)
            .await;
        let ticker_id = match ticker_row {
            Ok(Some(id)) => id,
            Ok(None) => {
                return Err(Self::rollback_after(
                    tx,
                    LogicError::TickerDoesntExist(ticker.to_string()).into(),
                )
                .await)
            }
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        };

        tx.commit().await?;
        Ok(ticker_id)
    }

    async fn insert_transaction(
        tx: &mut Transaction<'_, Postgres>,
        wallet_id: i32,
        ticker_id: i32,
        amount: Decimal,
        status: TransactionStatus,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO transactions (wallet_id, ticker_id, amount, status) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(wallet_id)
        .bind(ticker_id)
        .bind(amount)
        .bind(i32::from(status))
        .fetch_one(&mut **tx)
        .await
    }

    async fn update_transaction_status(
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        status: TransactionStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE transactions SET status = $1 WHERE id = $2")
            .bind(i32::from(status))
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Writes the audit row for a refused debit in its own committed write,
    /// separate from the rolled-back read-write transaction.
    async fn record_refused_withdraw(
        &self,
        wallet_id: i32,
        ticker_id: i32,
        ticker: &str,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO transactions (wallet_id, ticker_id, amount, status) VALUES ($1, $2, $3, $4)")
            .bind(wallet_id)
            .bind(ticker_id)
            .bind(-amount)
            .bind(i32::from(TransactionStatus::Error))
            .execute(&self.pool)
            .await?;

        Err(LogicError::NotEnoughCoins {
            wallet_id,
            ticker: ticker.to_string(),
        }
        .into())
    }

    async fn ticker_name(&self, ticker_id: i32) -> Result<String, RepositoryError> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM tickers WHERE ticker_id = $1")
            .bind(ticker_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(name)
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_wallet(&self) -> Result<WalletId, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>("INSERT INTO wallets DEFAULT VALUES RETURNING wallet_id")
            .fetch_one(&self.pool)
            .await?;
        Ok(WalletId(id))
    }

    async fn create_ticker(&self, name: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO tickers (name) VALUES ($1)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Credits a wallet. Writes `Created`, upserts the balance, then flips
    /// to `Success` — all inside one atomic unit, so a crash at any point
    /// leaves no persistent `Created` row.
    #[tracing::instrument(skip(self))]
    async fn invoice(&self, wallet_id: i32, ticker: &str, amount: Decimal) -> Result<(), RepositoryError> {
        let ticker_id = self.check_wallet_and_ticker(wallet_id, ticker).await?;

        let mut tx = self.pool.begin().await?;

        let tx_id = match Self::insert_transaction(&mut tx, wallet_id, ticker_id, amount, TransactionStatus::Created).await
        {
            Ok(id) => id,
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        };

        let upsert = sqlx::query(
            "INSERT INTO balances (wallet_id, ticker_id, amount) VALUES ($1, $2, $3)
             ON CONFLICT (wallet_id, ticker_id) DO UPDATE SET amount = balances.amount + $3",
        )
        .bind(wallet_id)
        .bind(ticker_id)
        .bind(amount)
        .execute(&mut *tx)
        .await;
        if let Err(e) = upsert {
            return Err(Self::rollback_after(tx, e.into()).await);
        }

        if let Err(e) = Self::update_transaction_status(&mut tx, tx_id, TransactionStatus::Success).await {
            return Err(Self::rollback_after(tx, e.into()).await);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Debits a wallet. Locks the balance row `FOR UPDATE` so two concurrent
    /// debits on the same `(wallet, ticker)` serialize instead of both
    /// reading a stale sufficiency check.
    #[tracing::instrument(skip(self))]
    async fn withdraw(&self, wallet_id: i32, ticker: &str, amount: Decimal) -> Result<(), RepositoryError> {
        let ticker_id = self.check_wallet_and_ticker(wallet_id, ticker).await?;

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, Decimal>(
            "SELECT amount FROM balances WHERE wallet_id = $1 AND ticker_id = $2 FOR UPDATE",
        )
        .bind(wallet_id)
        .bind(ticker_id)
        .fetch_optional(&mut *tx)
        .await;

        let current = match current {
            Ok(Some(amount)) => amount,
            Ok(None) => {
                if let Err(e) = tx.rollback().await {
                    tracing::warn!(error = %e, "rollback after missing balance row failed");
                }
                return self.record_refused_withdraw(wallet_id, ticker_id, ticker, amount).await;
            }
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        };

        // Balances never go negative or to zero, so an exact-balance
        // withdraw is refused here by the application check itself, rather
        // than by the `balances.amount > 0` constraint surfacing as an
        // opaque system error (see DESIGN.md).
        if current <= amount {
            if let Err(e) = tx.rollback().await {
                tracing::warn!(error = %e, "rollback after insufficient-funds check failed");
            }
            return self.record_refused_withdraw(wallet_id, ticker_id, ticker, amount).await;
        }

        let tx_id = match Self::insert_transaction(&mut tx, wallet_id, ticker_id, -amount, TransactionStatus::Created).await
        {
            Ok(id) => id,
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        };

        let update = sqlx::query("UPDATE balances SET amount = amount - $1 WHERE wallet_id = $2 AND ticker_id = $3")
            .bind(amount)
            .bind(wallet_id)
            .bind(ticker_id)
            .execute(&mut *tx)
            .await;
        if let Err(e) = update {
            return Err(Self::rollback_after(tx, e.into()).await);
        }

        if let Err(e) = Self::update_transaction_status(&mut tx, tx_id, TransactionStatus::Success).await {
            return Err(Self::rollback_after(tx, e.into()).await);
        }

        tx.commit().await?;
        Ok(())
    }

    /// Reads actual and frozen balances. The read transaction commits as
    /// soon as both cursors are drained so name resolution below doesn't
    /// hold locks.
    #[tracing::instrument(skip(self))]
    async fn get_balance(&self, wallet_id: i32) -> Result<GetBalanceResponse, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;

        let wallet_row = sqlx::query_scalar::<_, i32>("SELECT wallet_id FROM wallets WHERE wallet_id = $1")
            .bind(wallet_id)
            .fetch_optional(&mut *tx)
            .await;
        match wallet_row {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(Self::rollback_after(tx, LogicError::WalletDoesntExist(wallet_id).into()).await)
            }
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        }

        let balance_rows = match sqlx::query_as::<_, TickerAmountRow>(
            "SELECT ticker_id, amount FROM balances WHERE wallet_id = $1",
        )
        .bind(wallet_id)
        .fetch_all(&mut *tx)
        .await
        {
            Ok(rows) => rows,
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        };

        let frozen_rows = match sqlx::query_as::<_, TickerAmountRow>(
            "SELECT ticker_id, amount FROM transactions WHERE wallet_id = $1 AND status = $2",
        )
        .bind(wallet_id)
        .bind(i32::from(TransactionStatus::Created))
        .fetch_all(&mut *tx)
        .await
        {
            Ok(rows) => rows,
            Err(e) => return Err(Self::rollback_after(tx, e.into()).await),
        };

        tx.commit().await?;

        let mut actual_balance = HashMap::with_capacity(balance_rows.len());
        for row in balance_rows {
            let name = self.ticker_name(row.ticker_id).await?;
            actual_balance.insert(name, decimal_to_f64(row.amount));
        }

        let mut frozen_balance: HashMap<String, f64> = HashMap::new();
        for row in frozen_rows {
            let name = self.ticker_name(row.ticker_id).await?;
            *frozen_balance.entry(name).or_insert(0.0) += decimal_to_f64(row.amount);
        }

        Ok(GetBalanceResponse {
            actual_balance,
            frozen_balance,
        })
    }
}
