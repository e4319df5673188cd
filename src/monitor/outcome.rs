use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::LedgerResult;
use crate::ledger::client::LedgerClient;
use crate::ledger::models::{RequestRef, UnsignedTx};
use crate::monitor::cache::ProcessedCache;
use crate::monitor::report::DispatchOutcome;

pub const BUILDING_TX_MSG: &str = "Building the transaction...";
pub const TX_BUILT_MSG: &str = "Transaction successfully built.";
pub const SUBMITTING_TX_MSG: &str = "Signing and submitting the transaction...";

/// Takes a build result the rest of the way: sign, submit, remember.
pub struct OutcomeHandler {
    ledger: Arc<dyn LedgerClient>,
    cache: Arc<ProcessedCache>,
    quiet: bool,
}

impl OutcomeHandler {
    pub fn new(ledger: Arc<dyn LedgerClient>, cache: Arc<ProcessedCache>, quiet: bool) -> Self {
        Self {
            ledger,
            cache,
            quiet,
        }
    }

    /// Finish one unit of dispatch.
    ///
    /// `refs` are only marked as processed once the ledger has accepted the
    /// submission. Every failure is logged and handed back as an outcome,
    /// never propagated. `rendered` is how the caller wants `refs` to read
    /// in those log lines.
    pub async fn handle(
        &self,
        refs: Vec<RequestRef>,
        rendered: &str,
        built: LedgerResult<UnsignedTx>,
        label: &str,
    ) -> DispatchOutcome {
        let tx = match built {
            Ok(tx) => tx,
            Err(e) => {
                self.warn(&format!(
                    "Failed to build the {} transaction for {}: {}",
                    label, rendered, e
                ));
                return DispatchOutcome::Failure {
                    refs,
                    reason: e.to_string(),
                };
            }
        };

        debug!("{}", TX_BUILT_MSG);
        debug!("{}", SUBMITTING_TX_MSG);

        match self.ledger.sign_and_submit(tx).await {
            Ok(tx_hash) => {
                self.cache.record(&refs);
                info!("✅ {} tx hash: {} ({})", label, tx_hash, rendered);
                DispatchOutcome::Success { refs, tx_hash }
            }
            Err(e) => {
                self.warn(&format!(
                    "Failed to submit the {} transaction for {}: {}",
                    label, rendered, e
                ));
                DispatchOutcome::Failure {
                    refs,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Warnings go quiet with the session's `quiet` flag; outcomes don't.
    pub fn warn(&self, message: &str) {
        if !self.quiet {
            warn!("⚠️  {}", message);
        }
    }
}
