pub mod amount;
pub mod operation;
pub mod wire;

pub use amount::{amount_to_decimal, decimal_to_f64, AmountConversionError};
pub use operation::Operation;
pub use wire::{GetBalanceRequest, GetBalanceResponse, InvoiceRequest, ReplyEnvelope, WithdrawRequest};
