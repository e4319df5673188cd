use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    config::RouterConfig,
    error::{AppError, AppResult},
    ledger::HttpLedgerClient,
    monitor::{report_stream, CycleReport, Monitor, ScanHandle},
};

pub async fn initialize_monitor(config: RouterConfig) -> AppResult<ScanHandle> {
    info!("Initializing router components ...");

    let ledger = HttpLedgerClient::new(&config.ledger)
        .map_err(|e| AppError::Setup(format!("Cannot create ledger client: {}", e)))?;
    info!("✅ Ledger client configured for {}", config.ledger.url);

    // Structured cycle reports, one JSON line per cycle
    let (report_tx, report_rx) = mpsc::unbounded_channel();
    tokio::spawn(log_reports(report_rx));

    let handle = Monitor::new(config, Arc::new(ledger))
        .with_report_sink(report_tx)
        .start()
        .await?;

    info!("✅ Monitor started");
    Ok(handle)
}

async fn log_reports(receiver: UnboundedReceiver<CycleReport>) {
    let mut reports = report_stream(receiver);
    while let Some(report) = reports.next().await {
        match serde_json::to_string(&report) {
            Ok(line) => debug!(target: "handles_router::report", "{}", line),
            Err(e) => warn!("Failed to serialize cycle report: {:?}", e),
        }
    }
}
