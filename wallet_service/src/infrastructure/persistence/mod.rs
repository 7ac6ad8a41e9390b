pub mod models;
pub mod postgres_repository;

pub use postgres_repository::PostgresRepository;
