use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use wallet_service::config::AppConfig;
use wallet_service::consumer::ConsumerPool;
use wallet_service::domain::repository::Repository;
use wallet_service::infrastructure::broker::RabbitBroker;
use wallet_service::infrastructure::persistence::PostgresRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables. A missing .env is not fatal: in
    // containerized deployments configuration arrives as real env vars.
    if let Err(e) = dotenvy::dotenv() {
        tracing::warn!(error = %e, "no .env file loaded, continuing with process environment");
    }

    // 2. Configure logging.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("starting wallet service");

    let config = AppConfig::from_env();

    // 3. Connect to the database and run migrations.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database.connection_string())
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("connected to database and applied migrations");

    let repo: Arc<dyn Repository> = Arc::new(PostgresRepository::new(pool.clone()));

    // 4. Connect to the broker and declare the topic exchange.
    let (connection, _broker) = RabbitBroker::connect(&config.broker.amqp_addr()).await?;
    info!("connected to message broker");

    // 5. Start the consumer pool.
    let pool_handle = ConsumerPool::start(&connection, &config.queue_name, config.worker_count, repo).await?;
    info!(workers = config.worker_count, "consumer pool started");

    // 6. Run until a termination signal, then shut down in order: stop
    // workers, close the broker connection, close the database pool.
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    pool_handle.stop().await;
    connection.close(0, "shutting down").await?;
    pool.close().await;
    info!("wallet service stopped");

    Ok(())
}
