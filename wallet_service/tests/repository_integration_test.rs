//! Exercises `PostgresRepository` against a real, migrated Postgres database.
//! Each `#[sqlx::test]` gets its own freshly migrated database and rolls its
//! pool back automatically, so these don't need manual truncation between
//! runs. Requires `DATABASE_URL` to point at a reachable Postgres instance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use wallet_service::domain::error::{LogicError, RepositoryError};
use wallet_service::domain::repository::Repository;
use wallet_service::infrastructure::persistence::PostgresRepository;

async fn provision(pool: &PgPool, ticker: &str) -> (i32, i32) {
    let repo = PostgresRepository::new(pool.clone());
    let wallet_id = repo.create_wallet().await.unwrap();
    repo.create_ticker(ticker).await.unwrap();
    (i32::from(wallet_id), 0)
}

#[sqlx::test(migrations = "./migrations")]
async fn invoice_then_withdraw_conserves_the_balance(pool: PgPool) {
    // Arrange
    let repo = PostgresRepository::new(pool.clone());
    let (wallet_id, _) = provision(&pool, "USD").await;

    // Act
    repo.invoice(wallet_id, "USD", dec!(100)).await.unwrap();
    repo.withdraw(wallet_id, "USD", dec!(40)).await.unwrap();

    // Assert: conservation — balance equals the sum of Success amounts.
    let view = repo.get_balance(wallet_id).await.unwrap();
    assert_eq!(view.actual_balance.get("USD"), Some(&60.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn withdraw_of_exactly_the_full_balance_is_refused(pool: PgPool) {
    // Arrange
    let repo = PostgresRepository::new(pool.clone());
    let (wallet_id, _) = provision(&pool, "USD").await;
    repo.invoice(wallet_id, "USD", dec!(50)).await.unwrap();

    // Act
    let result = repo.withdraw(wallet_id, "USD", dec!(50)).await;

    // Assert: boundary case — the never-negative balance invariant wins
    // over a naive `<` sufficiency check.
    assert!(matches!(
        result,
        Err(RepositoryError::Logic(LogicError::NotEnoughCoins { .. }))
    ));
    let view = repo.get_balance(wallet_id).await.unwrap();
    assert_eq!(view.actual_balance.get("USD"), Some(&50.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn refused_withdraw_leaves_exactly_one_error_row(pool: PgPool) {
    // Arrange
    let repo = PostgresRepository::new(pool.clone());
    let (wallet_id, _) = provision(&pool, "USD").await;
    repo.invoice(wallet_id, "USD", dec!(10)).await.unwrap();

    // Act
    let result = repo.withdraw(wallet_id, "USD", dec!(20)).await;
    assert!(result.is_err());

    // Assert: audit of refused debits.
    let error_rows: i64 = sqlx::query_scalar(
        "SELECT count(*) FROM transactions WHERE wallet_id = $1 AND status = 1 AND amount = $2",
    )
    .bind(wallet_id)
    .bind(Decimal::from(-20))
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(error_rows, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn preflight_failure_on_unknown_wallet_writes_nothing(pool: PgPool) {
    // Act
    let repo = PostgresRepository::new(pool.clone());
    let result = repo.invoice(999, "USD", dec!(10)).await;

    // Assert: idempotent failure — no transaction row written.
    assert!(matches!(
        result,
        Err(RepositoryError::Logic(LogicError::WalletDoesntExist(999)))
    ));
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM transactions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_debits_on_the_same_balance_serialize(pool: PgPool) {
    // Arrange: balance = 100, two concurrent withdraws of 70.
    let repo = PostgresRepository::new(pool.clone());
    let (wallet_id, _) = provision(&pool, "USD").await;
    repo.invoice(wallet_id, "USD", dec!(100)).await.unwrap();

    let repo_a = PostgresRepository::new(pool.clone());
    let repo_b = PostgresRepository::new(pool.clone());

    // Act
    let (result_a, result_b) = tokio::join!(
        repo_a.withdraw(wallet_id, "USD", dec!(70)),
        repo_b.withdraw(wallet_id, "USD", dec!(70)),
    );

    // Assert: exactly one succeeds, final balance is 30.
    let successes = [&result_a, &result_b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    let view = repo.get_balance(wallet_id).await.unwrap();
    assert_eq!(view.actual_balance.get("USD"), Some(&30.0));
}
