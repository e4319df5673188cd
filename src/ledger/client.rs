use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::LedgerResult;
use crate::ledger::models::{Network, ProcessingMode, RequestRef, TxHash, UnsignedTx};

/// Identifies the smart handles instance being monitored
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScriptTarget<'a> {
    pub network: Network,
    pub mode: ProcessingMode,
    pub script_cbor: &'a str,
}

/// Everything the builder needs to route one request (Single) or a whole
/// batch of requests (Batch) in one transaction.
#[derive(Debug, Clone, Serialize)]
pub struct RouteTxParams<'a> {
    #[serde(flatten)]
    pub target: ScriptTarget<'a>,
    pub requests: &'a [RequestRef],
    pub route_address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_route_config: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_route_config: Option<&'a Value>,
}

/// Everything the builder needs to reclaim requests back to their owners.
#[derive(Debug, Clone, Serialize)]
pub struct ReclaimTxParams<'a> {
    #[serde(flatten)]
    pub target: ScriptTarget<'a>,
    pub requests: &'a [RequestRef],
    pub advanced_reclaim_config: &'a Value,
}

/// Ledger collaborator - chain queries, transaction building, signing and
/// submission.
///
/// The monitor never looks inside transactions; it only sequences these calls.
/// Implementations must be safe to call concurrently: a Single-mode cycle
/// builds and submits several transactions at once.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Address the requests of this instance sit at
    async fn monitored_address(&self, target: ScriptTarget<'_>) -> LedgerResult<String>;

    /// Pending requests currently sitting at the monitored address
    async fn fetch_candidates(&self, target: ScriptTarget<'_>) -> LedgerResult<Vec<RequestRef>>;

    async fn build_route(&self, params: RouteTxParams<'_>) -> LedgerResult<UnsignedTx>;

    async fn build_reclaim(&self, params: ReclaimTxParams<'_>) -> LedgerResult<UnsignedTx>;

    /// Sign with the operator wallet and submit. Returns once the network
    /// has accepted the transaction.
    async fn sign_and_submit(&self, tx: UnsignedTx) -> LedgerResult<TxHash>;
}
