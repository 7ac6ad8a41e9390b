use crate::domain::types::{TickerId, TransactionId, WalletId};
use rust_decimal::Decimal;

/// A customer account. No mutable attributes beyond its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    pub id: WalletId,
}

/// A currency, e.g. `"USD"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    pub id: TickerId,
    pub name: String,
}

/// A wallet's holding of one ticker. Strictly positive when present; absence
/// means a zero holding (invariant 1 in the data model).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub wallet_id: WalletId,
    pub ticker_id: TickerId,
    pub amount: Decimal,
}

/// Status of an append-only transaction record.
///
/// The integer discriminants match the `status` column's encoding
/// (`0 <= status <= 2`) so they can be bound/read without an intermediate
/// lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Success = 0,
    Error = 1,
    Created = 2,
}

impl From<TransactionStatus> for i32 {
    fn from(status: TransactionStatus) -> Self {
        status as i32
    }
}

impl TryFrom<i32> for TransactionStatus {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransactionStatus::Success),
            1 => Ok(TransactionStatus::Error),
            2 => Ok(TransactionStatus::Created),
            other => Err(other),
        }
    }
}

/// An append-only audit entry describing a single credit, debit, or refused
/// debit. Credits store a positive `amount`, debits a negative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub ticker_id: TickerId,
    pub amount: Decimal,
    pub status: TransactionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_status_round_trips_through_its_db_encoding() {
        for status in [
            TransactionStatus::Success,
            TransactionStatus::Error,
            TransactionStatus::Created,
        ] {
            let encoded: i32 = status.into();
            assert_eq!(TransactionStatus::try_from(encoded), Ok(status));
        }
    }

    #[test]
    fn rejects_out_of_range_status() {
        assert_eq!(TransactionStatus::try_from(3), Err(3));
    }
}
