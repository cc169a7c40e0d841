pub mod serve;
pub mod show;
pub mod sign;
pub mod verify;

use crate::{
    config::Host,
    store::{Method, PresignRequest},
};
use anyhow::Result;
use std::{collections::BTreeMap, net::SocketAddr};

#[derive(Debug)]
pub enum Action {
    Sign {
        host: Host,
        request: PresignRequest,
        json: bool,
    },
    Verify {
        host: Host,
        url: String,
        method: Method,
    },
    Serve {
        host: Host,
        listen: SocketAddr,
    },
    Show {
        hosts: BTreeMap<String, Host>,
    },
}

/// # Errors
///
/// Will return `Err` if the action fails
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Sign {
            host,
            request,
            json,
        } => sign::handle(&host, &request, json),
        Action::Verify { host, url, method } => verify::handle(&host, &url, method),
        Action::Serve { host, listen } => serve::handle(host, listen).await,
        Action::Show { hosts } => {
            show::handle(&hosts);
            Ok(())
        }
    }
}
