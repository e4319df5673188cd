use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::debug;

use crate::ledger::models::RequestRef;

/// Requests this session has already settled.
///
/// Append-only for the life of the session: a spent UTxO can never show up
/// again at the same reference, so nothing is ever evicted. Memory only, a
/// restart starts from an empty set.
#[derive(Debug, Default)]
pub struct ProcessedCache {
    entries: RwLock<HashSet<RequestRef>>,
}

impl ProcessedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record references whose transaction was accepted by the network.
    /// Only the outcome handler calls this, after a successful submit.
    pub fn record(&self, refs: &[RequestRef]) {
        let mut entries = self.entries.write();
        for r in refs {
            if entries.insert(r.clone()) {
                debug!("💾 Marked {} as processed", r);
            }
        }
    }

    pub fn contains(&self, r: &RequestRef) -> bool {
        self.entries.read().contains(r)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Eligibility filter: the candidates not yet processed, in their query
    /// order. Repeats within `candidates` collapse to the first occurrence.
    pub fn eligible(&self, candidates: Vec<RequestRef>) -> Vec<RequestRef> {
        let entries = self.entries.read();
        let mut seen = HashSet::with_capacity(candidates.len());
        candidates
            .into_iter()
            .filter(|r| !entries.contains(r) && seen.insert(r.clone()))
            .collect()
    }
}
