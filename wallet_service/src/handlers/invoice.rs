use crate::domain::repository::Repository;
use crate::handlers::{bad_request, classify, validated_amount};
use common::{InvoiceRequest, Operation, ReplyEnvelope};

const OP: &str = Operation::Invoice.routing_key();

/// Decodes, validates, credits the wallet, and classifies the outcome.
/// Never panics on malformed input — decode failure becomes a 400.
#[tracing::instrument(skip(repo, body))]
pub async fn handle(repo: &dyn Repository, body: &[u8]) -> ReplyEnvelope {
    let request: InvoiceRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => return bad_request(OP, e.to_string()),
    };

    let amount = match validated_amount(OP, request.amount) {
        Ok(a) => a,
        Err(reply) => return reply,
    };

    match repo.invoice(request.wallet_id, &request.ticker, amount).await {
        Ok(()) => ReplyEnvelope::success(OP),
        Err(err) => classify(OP, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{LogicError, RepositoryError};
    use crate::domain::repository::MockRepository;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn credits_on_success() {
        let mut repo = MockRepository::new();
        repo.expect_invoice()
            .withf(|wallet_id, ticker, amount| *wallet_id == 1 && ticker == "USD" && *amount == dec!(10))
            .returning(|_, _, _| Ok(()));

        let body = br#"{"wallet_id":1,"ticker":"USD","amount":10.0}"#;
        let reply = handle(&repo, body).await;

        assert_eq!(reply, ReplyEnvelope::success(OP));
    }

    #[tokio::test]
    async fn rejects_non_positive_amount_without_calling_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_invoice().times(0);

        let body = br#"{"wallet_id":1,"ticker":"USD","amount":0.0}"#;
        let reply = handle(&repo, body).await;

        assert_eq!(reply.code(), 400);
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let repo = MockRepository::new();
        let reply = handle(&repo, b"not json").await;
        assert_eq!(reply.code(), 400);
    }

    #[tokio::test]
    async fn maps_logic_error_to_400_and_system_error_to_500() {
        let mut repo = MockRepository::new();
        repo.expect_invoice()
            .returning(|_, _, _| Err(RepositoryError::Logic(LogicError::WalletDoesntExist(1))));

        let body = br#"{"wallet_id":1,"ticker":"USD","amount":10.0}"#;
        let reply = handle(&repo, body).await;
        assert_eq!(reply.code(), 400);
    }
}
