//! HTTP adapter around the signer.
//!
//! - `POST /api/sign` `{ key, method?, expires? }` returns `{ url, expiresAt }`
//! - `GET /api/health` reports which settings are present, never their values

pub mod auth;
pub mod error;
pub mod router;
pub mod state;

pub use self::{router::build_router, state::AppState};

use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve until ctrl-c
///
/// # Errors
///
/// Will return `Err` if the server fails
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state);

    log::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("unable to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
