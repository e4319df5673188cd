use handles_router::{bootstrap, AppError, RouterConfig};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Initialize logging and tracing
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,handles_router=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn abort(error: AppError) -> ! {
    error!("ABORT: {}", error);
    std::process::exit(1)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    info!("🚀 Starting smart handles router");

    // Optional config path as the only argument
    let path = std::env::args().nth(1);
    let config = RouterConfig::load(path.as_deref()).unwrap_or_else(|e| abort(e));

    let handle = bootstrap::initialize_monitor(config)
        .await
        .unwrap_or_else(|e| abort(e));

    tokio::signal::ctrl_c().await?;
    handle.stop();

    let cycles = handle.join().await?;
    info!("👋 Router stopped after {} cycle(s)", cycles);

    Ok(())
}
