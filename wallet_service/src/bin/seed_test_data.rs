use sqlx::postgres::PgPoolOptions;
use wallet_service::config::DatabaseConfig;
use wallet_service::domain::repository::Repository;
use wallet_service::infrastructure::persistence::PostgresRepository;

/// Dev-only provisioning helper: creates the four tickers and nine empty
/// wallets a manual exercise of the broker contract expects to already
/// exist.
const TICKERS: [&str; 4] = ["USD", "RUB", "EUR", "USDT"];
const WALLET_COUNT: usize = 9;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let db_config = DatabaseConfig::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_config.connection_string())
        .await?;

    let repo = PostgresRepository::new(pool);

    for ticker in TICKERS {
        repo.create_ticker(ticker)
            .await
            .map_err(|e| format!("can't create ticker {ticker}: {e}"))?;
        println!("created ticker {ticker}");
    }

    for _ in 0..WALLET_COUNT {
        let wallet_id = repo.create_wallet().await.map_err(|e| format!("can't create wallet: {e}"))?;
        println!("created wallet {wallet_id}");
    }

    println!("test data seeded");
    Ok(())
}
