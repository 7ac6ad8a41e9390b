use rust_decimal::Decimal;
use sqlx::FromRow;

/// Row shape shared by the actual-balance and frozen-balance queries: both
/// are `(ticker_id, amount)` pairs.
#[derive(Debug, FromRow)]
pub struct TickerAmountRow {
    pub ticker_id: i32,
    pub amount: Decimal,
}
