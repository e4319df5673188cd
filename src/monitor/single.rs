//! Single mode: one transaction per request, all requests of a cycle in flight
//! at once.

use futures::future::join_all;
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
    info!(
        "🔎 Found {} UTxO(s):\n{}",
        eligible.len(),
        render_refs(&eligible)
    );

    let label = format!("{} {}", ProcessingMode::Single, action.intent());
    let label = label.as_str();
    let target = ctx.target(ProcessingMode::Single);

    // Each future owns its request; a failure stays inside its own outcome
    let outcomes = join_all(eligible.into_iter().map(|request| async move {
        let rendered = request.short();
        debug!("{} ({})", BUILDING_TX_MSG, rendered);
        let built = action
            .build(ctx.ledger.as_ref(), target, std::slice::from_ref(&request))
            .await;
        ctx.outcomes
            .handle(vec![request], &rendered, built, label)
            .await
    }))
    .await;

    CycleOutcome::Dispatched { outcomes }
}
