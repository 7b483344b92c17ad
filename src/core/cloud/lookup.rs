//! Public address lookup over HTTPS.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::AddressLookup;
use crate::core::constants::PUBLIC_ADDRESS_URL;
use crate::error::{LookupError, Result};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct AddressResponse {
    ip: String,
}

/// Parse a `{"ip": "<address>"}` response body.
pub fn parse_address(body: &str) -> Result<String> {
    let response: AddressResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    let ip = response.ip.trim();
    if ip.is_empty() {
        return Err(LookupError::Malformed("empty address".to_string()).into());
    }
    Ok(ip.to_string())
}

/// Address lookup against an ipify-style endpoint.
pub struct HttpLookup {
    url: String,
}

impl HttpLookup {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for HttpLookup {
    fn default() -> Self {
        Self::new(PUBLIC_ADDRESS_URL)
    }
}

impl AddressLookup for HttpLookup {
    fn public_address(&self) -> Result<String> {
        debug!(url = %self.url, "looking up public address");

        let body = match ureq::get(&self.url)
            .set("User-Agent", "spots")
            .timeout(LOOKUP_TIMEOUT)
            .call()
        {
            Ok(resp) => resp
                .into_string()
                .map_err(|e| LookupError::Transport(e.to_string()))?,
            Err(ureq::Error::Status(code, _)) => return Err(LookupError::Status(code).into()),
            Err(e) => return Err(LookupError::Transport(e.to_string()).into()),
        };

        parse_address(&body)
    }
}
