//! Scriptable in-memory ledger used by the monitor tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::client::{LedgerClient, ReclaimTxParams, RouteTxParams, ScriptTarget};
use crate::ledger::models::{ActionIntent, RequestRef, TxHash, UnsignedTx};

/// One recorded interaction with the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Address,
    Fetch,
    Build {
        intent: ActionIntent,
        requests: Vec<RequestRef>,
    },
    Submit {
        requests: Vec<RequestRef>,
    },
}

#[derive(Default)]
struct State {
    candidates: Vec<RequestRef>,
    /// Queued fetch results consumed before falling back to `candidates`
    fetch_script: VecDeque<LedgerResult<Vec<RequestRef>>>,
    address_error: Option<LedgerError>,
    build_failures: HashSet<RequestRef>,
    submit_failures: HashSet<RequestRef>,
    calls: Vec<Call>,
    submitted: usize,
}

/// Ledger double: serves a fixed candidate set, fails builds or submits for
/// chosen references, and records every call it receives.
///
/// Unsigned transactions encode the references they cover so submission
/// failures can be targeted per request.
#[derive(Clone, Default)]
pub struct MockLedger {
    state: Arc<Mutex<State>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(self, candidates: Vec<RequestRef>) -> Self {
        self.state.lock().candidates = candidates;
        self
    }

    pub fn set_candidates(&self, candidates: Vec<RequestRef>) {
        self.state.lock().candidates = candidates;
    }

    pub fn push_fetch(&self, result: LedgerResult<Vec<RequestRef>>) {
        self.state.lock().fetch_script.push_back(result);
    }

    pub fn fail_address(&self, error: LedgerError) {
        self.state.lock().address_error = Some(error);
    }

    pub fn fail_build_for(&self, request: RequestRef) {
        self.state.lock().build_failures.insert(request);
    }

    pub fn fail_submit_for(&self, request: RequestRef) {
        self.state.lock().submit_failures.insert(request);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.build_failures.clear();
        state.submit_failures.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn build_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Build { .. }))
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Fetch).count()
    }

    fn encode(requests: &[RequestRef]) -> UnsignedTx {
        let tx_cbor = requests
            .iter()
            .map(RequestRef::to_string)
            .collect::<Vec<_>>()
            .join(",");
        UnsignedTx { tx_cbor }
    }

    fn decode(tx: &UnsignedTx) -> Vec<RequestRef> {
        tx.tx_cbor
            .split(',')
            .filter_map(|s| {
                let (hash, index) = s.split_once('#')?;
                Some(RequestRef::new(hash, index.parse().ok()?))
            })
            .collect()
    }

    fn build(&self, intent: ActionIntent, requests: &[RequestRef]) -> LedgerResult<UnsignedTx> {
        let mut state = self.state.lock();
        state.calls.push(Call::Build {
            intent,
            requests: requests.to_vec(),
        });

        if let Some(bad) = requests.iter().find(|r| state.build_failures.contains(*r)) {
            return Err(LedgerError::Build(format!("cannot spend {}", bad)));
        }
        Ok(Self::encode(requests))
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn monitored_address(&self, _target: ScriptTarget<'_>) -> LedgerResult<String> {
        let mut state = self.state.lock();
        state.calls.push(Call::Address);
        match &state.address_error {
            Some(error) => Err(error.clone()),
            None => Ok("addr_test1mock".to_string()),
        }
    }

    async fn fetch_candidates(&self, _target: ScriptTarget<'_>) -> LedgerResult<Vec<RequestRef>> {
        let mut state = self.state.lock();
        state.calls.push(Call::Fetch);
        match state.fetch_script.pop_front() {
            Some(result) => result,
            None => Ok(state.candidates.clone()),
        }
    }

    async fn build_route(&self, params: RouteTxParams<'_>) -> LedgerResult<UnsignedTx> {
        // Let sibling requests interleave like real network calls would
        tokio::task::yield_now().await;
        self.build(ActionIntent::Route, params.requests)
    }

    async fn build_reclaim(&self, params: ReclaimTxParams<'_>) -> LedgerResult<UnsignedTx> {
        tokio::task::yield_now().await;
        self.build(ActionIntent::Reclaim, params.requests)
    }

    async fn sign_and_submit(&self, tx: UnsignedTx) -> LedgerResult<TxHash> {
        tokio::task::yield_now().await;
        let requests = Self::decode(&tx);

        let mut state = self.state.lock();
        state.calls.push(Call::Submit {
            requests: requests.clone(),
        });

        if let Some(bad) = requests.iter().find(|r| state.submit_failures.contains(*r)) {
            return Err(LedgerError::Submit(format!("rejected {}", bad)));
        }
        state.submitted += 1;
        Ok(TxHash(format!("tx{:04}", state.submitted)))
    }
}
