use sqlx::postgres::PgPoolOptions;
use wallet_service::config::DatabaseConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let db_config = DatabaseConfig::from_env();

    println!("Connecting to {}...", db_config.dbname);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_config.connection_string())
        .await
        .map_err(|e| format!("failed to connect: {e}"))?;

    println!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| format!("migration failed: {e}"))?;

    println!("wallet_db initialized successfully");
    Ok(())
}
