//! Routing agent for smart handles scripts.
//!
//! Watches a script address for pending route requests and settles them,
//! either one transaction per request (`Single`) or one aggregated
//! transaction per scan (`Batch`), collecting the router fee on the way.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod ledger;
pub mod monitor;

pub use config::RouterConfig;
pub use error::{AppError, AppResult, LedgerError, LedgerResult};
pub use ledger::{LedgerClient, HttpLedgerClient};
pub use monitor::{CycleReport, Monitor, ScanHandle};
