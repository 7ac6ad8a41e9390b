use crate::domain::error::{LogicError, RepositoryError};
use crate::domain::repository::Repository;
use crate::handlers::{classify, handle_balance, handle_invoice, handle_withdraw};
use common::{Operation, ReplyEnvelope};

/// Routes an inbound routing key to its handler. An unrecognized key
/// never reaches the repository; it produces an immediate 400 naming the
/// key.
pub async fn dispatch(repo: &dyn Repository, routing_key: &str, body: &[u8]) -> ReplyEnvelope {
    match Operation::from_routing_key(routing_key) {
        Some(Operation::Invoice) => handle_invoice(repo, body).await,
        Some(Operation::Withdraw) => handle_withdraw(repo, body).await,
        Some(Operation::Balance) => handle_balance(repo, body).await,
        None => classify(
            routing_key,
            RepositoryError::Logic(LogicError::UnknownOperation(routing_key.to_string())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockRepository;

    #[tokio::test]
    async fn unknown_routing_key_is_a_400_naming_the_key() {
        let repo = MockRepository::new();
        let reply = dispatch(&repo, "transfer", b"{}").await;

        assert_eq!(reply.code(), 400);
        assert!(matches!(reply, ReplyEnvelope::Error { reason, .. } if reason.contains("transfer")));
    }

    #[tokio::test]
    async fn routes_balance_to_the_balance_handler() {
        let mut repo = MockRepository::new();
        repo.expect_get_balance().returning(|_| {
            Ok(common::GetBalanceResponse::default())
        });

        let reply = dispatch(&repo, "balance", br#"{"wallet_id":1}"#).await;
        assert_eq!(reply.operation(), "balance");
        assert_eq!(reply.code(), 200);
    }
}
