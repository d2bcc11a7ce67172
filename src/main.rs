//! Focusdesk - A state-managed HTTP server for a personal productivity
//! dashboard
//!
//! This is the main entry point: the composition root that builds the one
//! session host, spawns the timer background tasks, and serves the API.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use focusdesk::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{alarm_playback_task, countdown_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focusdesk={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focusdesk server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, focus={}min, break={}min, cycles={}",
        config.host, config.port, config.focus_minutes, config.break_minutes, config.cycles
    );

    // Create the session host: the single timer instance for this process
    let state = Arc::new(AppState::new(&config));

    // Start the timer background tasks
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });
    let alarm_state = Arc::clone(&state);
    tokio::spawn(async move {
        alarm_playback_task(alarm_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timer            - Current timer snapshot");
    info!("  POST /timer/start      - Begin a fresh session");
    info!("  POST /timer/pause      - Pause the countdown");
    info!("  POST /timer/resume     - Resume the countdown");
    info!("  POST /timer/reset      - Return to idle");
    info!("  POST /timer/alarm/stop - Silence the alarm");
    info!("  PUT  /timer/settings   - Update focus/break/cycles");
    info!("  POST /expenses/extract - Receipt extraction demo");
    info!("  GET  /expenses/logs    - Expense log store");
    info!("  GET  /status           - Server status and timer");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
