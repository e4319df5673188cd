use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::models::{render_refs, ActionIntent, ProcessingMode, RequestRef, TxHash};

/// Result of one unit of dispatch work: a single request, or a whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DispatchOutcome {
    Success {
        refs: Vec<RequestRef>,
        tx_hash: TxHash,
    },
    Failure {
        refs: Vec<RequestRef>,
        reason: String,
    },
}

impl DispatchOutcome {
    pub fn refs(&self) -> &[RequestRef] {
        match self {
            DispatchOutcome::Success { refs, .. } | DispatchOutcome::Failure { refs, .. } => refs,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success { .. })
    }

    pub fn rendered_refs(&self) -> String {
        render_refs(self.refs())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Candidate query failed, nothing was dispatched
    QueryFailed { reason: String },
    /// Nothing eligible this cycle
    NoneFound,
    Dispatched { outcomes: Vec<DispatchOutcome> },
}

/// Structured summary emitted once per scan cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub mode: ProcessingMode,
    pub intent: ActionIntent,
    /// Requests returned by the ledger before filtering
    pub found: usize,
    /// Requests left after dropping already-processed ones
    pub eligible: usize,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    pub fn outcomes(&self) -> &[DispatchOutcome] {
        match &self.outcome {
            CycleOutcome::Dispatched { outcomes } => outcomes,
            _ => &[],
        }
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes().iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes().len() - self.succeeded()
    }
}
