pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use newsdesk_core::{AppConfig, NewsAggregator};
use tracing::{info, warn};

pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;

/// Serve the API on the configured address until Ctrl+C
pub async fn run_server(config: &AppConfig, aggregator: Arc<NewsAggregator>) -> std::io::Result<()> {
    let app = create_router(AppState::new(aggregator));

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr()).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        // Never resolve, keep serving
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
