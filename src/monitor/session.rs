use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::RouterConfig;
use crate::error::{AppError, AppResult};
use crate::ledger::client::LedgerClient;
use crate::monitor::cache::ProcessedCache;
use crate::monitor::dispatch::{DispatchContext, DispatchPlan};
use crate::monitor::outcome::OutcomeHandler;
use crate::monitor::report::{CycleOutcome, CycleReport};
use crate::monitor::scheduler::{ScanHandle, ScanScheduler};

/// A monitoring session over one smart handles instance.
///
/// Owns the processed-request cache; nothing is shared between sessions.
pub struct Monitor {
    config: RouterConfig,
    ledger: Arc<dyn LedgerClient>,
    cache: Arc<ProcessedCache>,
    report_sink: Option<UnboundedSender<CycleReport>>,
}

impl Monitor {
    pub fn new(config: RouterConfig, ledger: Arc<dyn LedgerClient>) -> Self {
        Self {
            config,
            ledger,
            cache: Arc::new(ProcessedCache::new()),
            report_sink: None,
        }
    }

    /// Receive one [`CycleReport`] per completed cycle
    pub fn with_report_sink(mut self, sink: UnboundedSender<CycleReport>) -> Self {
        self.report_sink = Some(sink);
        self
    }

    pub fn cache(&self) -> Arc<ProcessedCache> {
        self.cache.clone()
    }

    /// Validate the session, probe the ledger, then start scanning.
    ///
    /// Errors returned here are fatal: a reclaim session without reclaim
    /// settings fails before any ledger call, and an unreachable ledger fails
    /// before the first cycle. Everything after start-up is recovered from
    /// inside the cycle.
    pub async fn start(self) -> AppResult<ScanHandle> {
        let plan = DispatchPlan::resolve(&self.config)?;
        let mode = plan.mode();

        let ctx = DispatchContext {
            ledger: self.ledger.clone(),
            outcomes: OutcomeHandler::new(
                self.ledger.clone(),
                self.cache.clone(),
                self.config.quiet,
            ),
            network: self.config.network,
            script_cbor: self.config.script_cbor.clone(),
        };

        let address = self
            .ledger
            .monitored_address(ctx.target(mode))
            .await
            .map_err(|e| AppError::Setup(format!("Cannot reach the ledger: {}", e)))?;

        info!(
            "📡 Monitoring {} smart handles script for {} requests on {}{}",
            self.config.label,
            mode.as_str().to_uppercase(),
            self.config.network.as_str().to_uppercase(),
            if self.config.reclaim { " to RECLAIM" } else { "" }
        );
        info!("Querying: {}", address);

        let cycle = Arc::new(ScanCycle {
            plan,
            ctx,
            cache: self.cache,
            report_sink: self.report_sink,
        });

        let scheduler = ScanScheduler::new(self.config.polling_interval());
        Ok(scheduler.start(move || {
            let cycle = cycle.clone();
            async move {
                cycle.run().await;
            }
        }))
    }
}

/// Expose a report receiver as a `Stream`
pub fn report_stream(receiver: UnboundedReceiver<CycleReport>) -> impl Stream<Item = CycleReport> {
    UnboundedReceiverStream::new(receiver)
}

/// One pass of fetch → filter → dispatch
struct ScanCycle {
    plan: DispatchPlan,
    ctx: DispatchContext,
    cache: Arc<ProcessedCache>,
    report_sink: Option<UnboundedSender<CycleReport>>,
}

impl ScanCycle {
    #[instrument(skip(self), fields(mode = %self.plan.mode(), intent = %self.plan.intent()))]
    async fn run(&self) -> CycleReport {
        let cycle_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mode = self.plan.mode();
        debug!("🔄 Starting scan cycle {}", cycle_id);

        let (found, eligible, outcome) =
            match self.ctx.ledger.fetch_candidates(self.ctx.target(mode)).await {
                Ok(candidates) => {
                    let found = candidates.len();
                    let eligible = self.cache.eligible(candidates);
                    let count = eligible.len();
                    (found, count, self.plan.dispatch(&self.ctx, eligible).await)
                }
                Err(e) => {
                    self.ctx.outcomes.warn(&e.to_string());
                    let reason = e.to_string();
                    (0, 0, CycleOutcome::QueryFailed { reason })
                }
            };

        let report = CycleReport {
            cycle_id,
            started_at,
            mode,
            intent: self.plan.intent(),
            found,
            eligible,
            outcome,
        };

        if let CycleOutcome::Dispatched { .. } = report.outcome {
            info!(
                "✓ Scan cycle completed: {} succeeded, {} failed",
                report.succeeded(),
                report.failed()
            );
        }

        if let Some(sink) = &self.report_sink {
            // A dropped receiver only means nobody is listening any more
            let _ = sink.send(report.clone());
        }

        report
    }
}
