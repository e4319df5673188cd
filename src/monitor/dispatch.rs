use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::config::RouterConfig;
use crate::error::{AppError, AppResult, LedgerResult};
use crate::ledger::client::{LedgerClient, ReclaimTxParams, RouteTxParams, ScriptTarget};
use crate::ledger::models::{ActionIntent, Network, ProcessingMode, RequestRef, UnsignedTx};
use crate::monitor::outcome::OutcomeHandler;
use crate::monitor::report::CycleOutcome;
use crate::monitor::{batch, single};

/// Payout side of a route transaction
#[derive(Debug, Clone)]
pub struct RouteSettings {
    pub destination: String,
    pub simple_route_config: Option<Value>,
    pub advanced_route_config: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ReclaimSettings {
    pub advanced_reclaim_config: Value,
}

/// What gets built for the requests of a cycle
#[derive(Debug, Clone)]
pub enum Action {
    Route(RouteSettings),
    Reclaim(ReclaimSettings),
}

impl Action {
    pub fn intent(&self) -> ActionIntent {
        match self {
            Action::Route(_) => ActionIntent::Route,
            Action::Reclaim(_) => ActionIntent::Reclaim,
        }
    }

    /// Ask the ledger to build the transaction settling `requests`
    pub async fn build(
        &self,
        ledger: &dyn LedgerClient,
        target: ScriptTarget<'_>,
        requests: &[RequestRef],
    ) -> LedgerResult<UnsignedTx> {
        match self {
            Action::Route(settings) => {
                ledger
                    .build_route(RouteTxParams {
                        target,
                        requests,
                        route_address: &settings.destination,
                        simple_route_config: settings.simple_route_config.as_ref(),
                        advanced_route_config: settings.advanced_route_config.as_ref(),
                    })
                    .await
            }
            Action::Reclaim(settings) => {
                ledger
                    .build_reclaim(ReclaimTxParams {
                        target,
                        requests,
                        advanced_reclaim_config: &settings.advanced_reclaim_config,
                    })
                    .await
            }
        }
    }
}

/// Mode dispatcher: {Single, Batch} × {Route, Reclaim}, decided once per
/// session. A reclaim plan always carries its reclaim settings.
#[derive(Debug, Clone)]
pub enum DispatchPlan {
    Single(Action),
    Batch(Action),
}

impl DispatchPlan {
    /// Resolve the plan from configuration. Fails when reclaiming without an
    /// advanced reclaim config; callers treat that as fatal.
    pub fn resolve(config: &RouterConfig) -> AppResult<Self> {
        let action = match config.intent() {
            ActionIntent::Route => Action::Route(RouteSettings {
                destination: config.route_destination.clone(),
                simple_route_config: config.simple_route_config.clone(),
                advanced_route_config: config.advanced_route_config.clone(),
            }),
            ActionIntent::Reclaim => {
                let advanced_reclaim_config = config
                    .advanced_reclaim_config
                    .clone()
                    .ok_or(AppError::MissingReclaimConfig)?;
                Action::Reclaim(ReclaimSettings {
                    advanced_reclaim_config,
                })
            }
        };

        Ok(match config.mode() {
            ProcessingMode::Single => DispatchPlan::Single(action),
            ProcessingMode::Batch => DispatchPlan::Batch(action),
        })
    }

    pub fn mode(&self) -> ProcessingMode {
        match self {
            DispatchPlan::Single(_) => ProcessingMode::Single,
            DispatchPlan::Batch(_) => ProcessingMode::Batch,
        }
    }

    pub fn action(&self) -> &Action {
        match self {
            DispatchPlan::Single(action) | DispatchPlan::Batch(action) => action,
        }
    }

    pub fn intent(&self) -> ActionIntent {
        self.action().intent()
    }

    /// e.g. "single route", "batch reclaim"
    pub fn label(&self) -> String {
        format!("{} {}", self.mode(), self.intent())
    }

    /// Run the selected strategy over this cycle's eligible requests
    pub async fn dispatch(&self, ctx: &DispatchContext, eligible: Vec<RequestRef>) -> CycleOutcome {
        if eligible.is_empty() {
            info!("No {} requests found", self.mode());
            return CycleOutcome::NoneFound;
        }

        match self {
            DispatchPlan::Single(action) => single::dispatch(ctx, action, eligible).await,
            DispatchPlan::Batch(action) => batch::dispatch(ctx, action, eligible).await,
        }
    }
}

/// What the strategies share for the life of a session
pub struct DispatchContext {
    pub ledger: Arc<dyn LedgerClient>,
    pub outcomes: OutcomeHandler,
    pub network: Network,
    pub script_cbor: String,
}

impl DispatchContext {
    pub fn target(&self, mode: ProcessingMode) -> ScriptTarget<'_> {
        ScriptTarget {
            network: self.network,
            mode,
            script_cbor: &self.script_cbor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn config(extra: &str) -> RouterConfig {
        let source = format!(
            r#"
            script_cbor = "00"
            route_destination = "addr_test1qpdest"
            {}
            "#,
            extra
        );
        RouterConfig::from_source(&source, FileFormat::Toml).unwrap()
    }

    #[test]
    fn test_resolves_all_four_plans() {
        let plan = DispatchPlan::resolve(&config(r#"script_target = "Single""#)).unwrap();
        assert_eq!(plan.label(), "single route");

        let plan = DispatchPlan::resolve(&config(r#"script_target = "Batch""#)).unwrap();
        assert_eq!(plan.label(), "batch route");

        let reclaim = r#"
            reclaim = true
            advanced_reclaim_config = { fee = 500000 }
        "#;
        let plan =
            DispatchPlan::resolve(&config(&format!("script_target = \"Single\"\n{}", reclaim)))
                .unwrap();
        assert_eq!(plan.label(), "single reclaim");

        let plan =
            DispatchPlan::resolve(&config(&format!("script_target = \"Batch\"\n{}", reclaim)))
                .unwrap();
        assert_eq!(plan.mode(), ProcessingMode::Batch);
        assert_eq!(plan.intent(), ActionIntent::Reclaim);
    }

    #[test]
    fn test_reclaim_without_config_is_rejected() {
        let result = DispatchPlan::resolve(&config(
            r#"
            script_target = "Batch"
            reclaim = true
            "#,
        ));
        assert!(matches!(result, Err(AppError::MissingReclaimConfig)));
    }

    #[test]
    fn test_route_settings_carry_destination() {
        let plan = DispatchPlan::resolve(&config(r#"script_target = "Single""#)).unwrap();
        match plan.action() {
            Action::Route(settings) => {
                assert_eq!(settings.destination, "addr_test1qpdest");
                assert!(settings.simple_route_config.is_none());
            }
            other => panic!("expected route, got {:?}", other),
        }
    }
}
