use crate::{
    config::Host,
    server::{self, AppState},
};
use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

/// # Errors
///
/// Will return `Err` if the address can not be bound or the server fails
pub async fn handle(host: Host, listen: SocketAddr) -> Result<()> {
    // a misconfigured host still serves, every sign call reports what is missing
    if let Err(err) = host.store() {
        log::warn!("{err}");
    }

    if host.passcode().is_none() {
        log::warn!("no passcode set, anyone reaching {listen} can sign");
    }

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("unable to listen on {listen}"))?;

    server::serve(listener, Arc::new(AppState::new(host))).await
}
