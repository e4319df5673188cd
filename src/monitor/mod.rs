// Monitoring & dispatch engine
pub mod batch;
pub mod cache;
pub mod dispatch;
pub mod outcome;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod single;

pub use cache::ProcessedCache;
pub use dispatch::DispatchPlan;
pub use report::{CycleOutcome, CycleReport, DispatchOutcome};
pub use scheduler::{ScanHandle, ScanScheduler, SchedulerState};
pub use session::{report_stream, Monitor};
