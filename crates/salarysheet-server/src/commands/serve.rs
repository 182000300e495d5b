//! `salarysheet serve`

use tokio::net::TcpListener;
use tracing::info;

use crate::config::ResolvedConfig;
use crate::error::ServerResult;
use crate::routes::{AppState, router};

use super::build_processor;

pub async fn serve(resolved: ResolvedConfig) -> ServerResult<()> {
    let processor = build_processor(&resolved)?;
    let listener = TcpListener::bind(&resolved.bind).await?;
    info!(
        addr = %listener.local_addr()?,
        spreadsheet = %resolved.sheets.spreadsheet_id,
        "salarysheet listening"
    );

    axum::serve(listener, router(AppState::new(processor)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
