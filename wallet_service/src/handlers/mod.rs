mod balance;
mod invoice;
mod withdraw;

pub use balance::handle as handle_balance;
pub use invoice::handle as handle_invoice;
pub use withdraw::handle as handle_withdraw;

use crate::domain::error::{LogicError, RepositoryError};
use common::amount_to_decimal;
use common::ReplyEnvelope;
use rust_decimal::Decimal;

/// Shared outcome classification: logic errors and malformed input map to
/// 400, anything else to 500. The single place a domain error becomes a
/// `ReplyEnvelope`; every 400 path funnels through here rather than building
/// one ad hoc.
pub(crate) fn classify(operation: &str, err: RepositoryError) -> ReplyEnvelope {
    match err.as_logic() {
        Some(logic) => ReplyEnvelope::error(operation, 400, logic.to_string()),
        None => ReplyEnvelope::error(operation, 500, err.to_string()),
    }
}

pub(crate) fn bad_request(operation: &str, reason: impl Into<String>) -> ReplyEnvelope {
    classify(operation, RepositoryError::Logic(LogicError::BadRequest(reason.into())))
}

/// Converts a wire `f64` amount into the internal fixed-point representation
/// and enforces `amount > 0`. A malformed float or a non-positive amount
/// both fail validation, matching `ValidationAmount`.
fn validated_amount(operation: &str, raw: f64) -> Result<Decimal, ReplyEnvelope> {
    let amount = amount_to_decimal(raw).map_err(|e| bad_request(operation, e.to_string()))?;
    if amount <= Decimal::ZERO {
        return Err(classify(operation, RepositoryError::Logic(LogicError::ValidationAmount)));
    }
    Ok(amount)
}
