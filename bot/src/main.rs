use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod services;
mod state;

use state::AppState;

/// Build metadata embedded by build.rs
fn build_info() -> String {
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let git_branch = option_env!("GIT_BRANCH").unwrap_or("unknown");
    let build_time_raw = option_env!("BUILD_TIME").unwrap_or("unknown");
    let build_time = build_time_raw
        .parse::<i64>()
        .ok()
        .and_then(|epoch| chrono::DateTime::from_timestamp(epoch, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| build_time_raw.to_string());

    format!(
        "v{} ({}@{}, built {})",
        env!("CARGO_PKG_VERSION"),
        git_branch,
        git_hash,
        build_time
    )
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting sensex-bot {}", build_info());

    let app_state = AppState::new()?;
    let mut engine = app_state.build_engine()?;
    tracing::info!("Engine initialized");

    tokio::select! {
        _ = engine.run() => {}
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => tracing::info!("Interrupted, shutting down"),
                Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
            }
        }
    }

    Ok(())
}
