use crate::{
    config::Host,
    store::{Method, verify::verify},
};
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use colored::Colorize;

/// # Errors
///
/// Will return `Err` if the URL does not verify
pub fn handle(host: &Host, url: &str, method: Method) -> Result<()> {
    let store = host.store()?;

    let verified = verify(&store, url, method, Utc::now())?;

    println!("{}", "valid".green().bold());
    println!("{:>8}: {}", "method", verified.method);
    println!("{:>8}: {}", "key", verified.key);
    println!(
        "{:>8}: {}",
        "signed",
        verified.signed_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    println!(
        "{:>8}: {}",
        "expires",
        verified
            .expires_at
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    Ok(())
}
