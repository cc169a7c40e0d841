use crate::{
    config::Host,
    server::router::SignResponse,
    store::{PresignRequest, presign},
};
use anyhow::Result;

/// Print the presigned URL, or `{"url", "expiresAt"}` with `--json`
///
/// # Errors
///
/// Will return `Err` if the host is misconfigured
pub fn handle(host: &Host, request: &PresignRequest, json: bool) -> Result<()> {
    let store = host.store()?;

    log::debug!("store:\n{store}");

    let presigned = presign(&store, request)?;

    log::info!(
        "signed {} {} for {}s",
        request.method(),
        request.key(),
        request.expires()
    );

    if json {
        let response = SignResponse::from(presigned);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{presigned}");
    }

    Ok(())
}
