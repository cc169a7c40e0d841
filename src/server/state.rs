use crate::config::Host;
use crate::store::{PresignRequest, PresignedUrl, SignError, presign};

/// Shared server state. The host is resolved into a store on every call, so
/// the server starts even when the configuration is incomplete and reports
/// it per request.
#[derive(Debug)]
pub struct AppState {
    host: Host,
}

impl AppState {
    #[must_use]
    pub const fn new(host: Host) -> Self {
        Self { host }
    }

    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// # Errors
    ///
    /// Will return `Err` if the host is misconfigured or signing fails
    pub fn sign(&self, request: &PresignRequest) -> Result<PresignedUrl, SignError> {
        let store = self.host.store()?;
        presign(&store, request)
    }
}
