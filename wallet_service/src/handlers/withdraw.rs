use crate::domain::repository::Repository;
use crate::handlers::{bad_request, classify, validated_amount};
use common::{Operation, ReplyEnvelope, WithdrawRequest};

const OP: &str = Operation::Withdraw.routing_key();

/// Decodes, validates, debits the wallet, and classifies the outcome.
/// Insufficient funds surfaces as a 400 via `classify`, same as any other
/// logic error.
#[tracing::instrument(skip(repo, body))]
pub async fn handle(repo: &dyn Repository, body: &[u8]) -> ReplyEnvelope {
    let request: WithdrawRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => return bad_request(OP, e.to_string()),
    };

    let amount = match validated_amount(OP, request.amount) {
        Ok(a) => a,
        Err(reply) => return reply,
    };

    match repo.withdraw(request.wallet_id, &request.ticker, amount).await {
        Ok(()) => ReplyEnvelope::success(OP),
        Err(err) => classify(OP, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{LogicError, RepositoryError};
    use crate::domain::repository::MockRepository;

    #[tokio::test]
    async fn debits_on_success() {
        let mut repo = MockRepository::new();
        repo.expect_withdraw().returning(|_, _, _| Ok(()));

        let body = br#"{"wallet_id":1,"ticker":"USD","amount":5.0}"#;
        let reply = handle(&repo, body).await;

        assert_eq!(reply, ReplyEnvelope::success(OP));
    }

    #[tokio::test]
    async fn insufficient_funds_is_a_400_not_a_500() {
        let mut repo = MockRepository::new();
        repo.expect_withdraw().returning(|_, _, _| {
            Err(RepositoryError::Logic(LogicError::NotEnoughCoins {
                wallet_id: 1,
                ticker: "USD".to_string(),
            }))
        });

        let body = br#"{"wallet_id":1,"ticker":"USD","amount":5.0}"#;
        let reply = handle(&repo, body).await;

        assert_eq!(reply.code(), 400);
    }

    #[tokio::test]
    async fn rejects_negative_amount() {
        let mut repo = MockRepository::new();
        repo.expect_withdraw().times(0);

        let body = br#"{"wallet_id":1,"ticker":"USD","amount":-5.0}"#;
        let reply = handle(&repo, body).await;

        assert_eq!(reply.code(), 400);
    }
}
