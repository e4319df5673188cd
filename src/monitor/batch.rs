//! Batch mode: every eligible request of a cycle settled by one aggregated
//! transaction. It lands or fails as a whole.

use tracing::{debug, info};

use crate::ledger::models::{render_refs, ProcessingMode, RequestRef};
use crate::monitor::dispatch::{Action, DispatchContext};
use crate::monitor::outcome::BUILDING_TX_MSG;
use crate::monitor::report::CycleOutcome;

pub async fn dispatch(
    ctx: &DispatchContext,
    action: &Action,
    eligible: Vec<RequestRef>,
) -> CycleOutcome {
    let rendered = render_refs(&eligible);
    info!("🔎 Found {} UTxO(s):\n{}", eligible.len(), rendered);
    debug!("{}", BUILDING_TX_MSG);

    let label = format!("{} {}", ProcessingMode::Batch, action.intent());
    let built = action
        .build(
            ctx.ledger.as_ref(),
            ctx.target(ProcessingMode::Batch),
            &eligible,
        )
        .await;
    let outcome = ctx.outcomes.handle(eligible, &rendered, built, &label).await;

    CycleOutcome::Dispatched {
        outcomes: vec![outcome],
    }
}
