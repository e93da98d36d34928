use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use usdc_dashboard::{api, config, DashboardState};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    info!("USDC Dashboard starting...");

    let cfg = config::load()?;
    info!("  Token API: {}", cfg.token_api_url);
    info!("  Credential configured: {}", cfg.api_token.is_some());
    info!("  Port: {}", cfg.port);
    info!("  History mode: {:?}", cfg.history_mode);

    let state = Arc::new(DashboardState::new(&cfg)?);

    // Initial load; later reloads only happen through POST /refresh
    let initial = tokio::spawn({
        let state = Arc::clone(&state);
        async move {
            let snap = state.refresh().await;
            match snap.error_message {
                Some(msg) => error!("Initial load failed: {}", msg),
                None => info!(
                    "Initial load: {} networks, {} transfers",
                    snap.network_metrics.len(),
                    snap.large_transfers.len()
                ),
            }
        }
    });

    let api_handle = tokio::spawn({
        let state = Arc::clone(&state);
        async move { api::serve(cfg.port, state).await }
    });

    tokio::select! {
        res = api_handle => match res {
            Ok(Ok(_)) => info!("API exited cleanly"),
            Ok(Err(e)) => error!("API error: {:?}", e),
            Err(e) => error!("API task panicked: {:?}", e),
        },
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received, stopping...");
        }
    }

    initial.abort();
    info!("USDC Dashboard stopped.");
    Ok(())
}
