use crate::domain::repository::Repository;
use crate::handlers::{bad_request, classify};
use common::{GetBalanceRequest, Operation, ReplyEnvelope};

const OP: &str = Operation::Balance.routing_key();

/// Decodes the request, reads the balance view, and embeds it as a
/// JSON-encoded string in the success envelope's `body`.
#[tracing::instrument(skip(repo, body))]
pub async fn handle(repo: &dyn Repository, body: &[u8]) -> ReplyEnvelope {
    let request: GetBalanceRequest = match serde_json::from_slice(body) {
        Ok(r) => r,
        Err(e) => return bad_request(OP, e.to_string()),
    };

    match repo.get_balance(request.wallet_id).await {
        Ok(view) => match serde_json::to_string(&view) {
            Ok(body) => ReplyEnvelope::success_with_body(OP, body),
            Err(e) => ReplyEnvelope::error(OP, 500, e.to_string()),
        },
        Err(err) => classify(OP, err),
    }
}
