use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// `amount` crosses the wire as a float (per the documented wire contract) but is
/// held internally as a fixed-point decimal so repeated credits/debits cannot drift.
#[derive(Debug, thiserror::Error)]
#[error("amount {0} cannot be represented as a decimal")]
pub struct AmountConversionError(pub f64);

pub fn amount_to_decimal(amount: f64) -> Result<Decimal, AmountConversionError> {
    Decimal::from_f64(amount).ok_or(AmountConversionError(amount))
}

pub fn decimal_to_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_a_typical_amount_both_ways() {
        let decimal = amount_to_decimal(10.5).unwrap();
        assert_eq!(decimal, dec!(10.5));
        assert_eq!(decimal_to_f64(decimal), 10.5);
    }

    #[test]
    fn rejects_nan() {
        assert!(amount_to_decimal(f64::NAN).is_err());
    }
}
