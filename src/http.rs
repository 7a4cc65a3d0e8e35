use std::time::Duration;

use crate::error::SwapError;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, SwapError> {
    // Already installed is fine; any provider works for outbound TLS.
    let _ = rustls::crypto::ring::default_provider().install_default();

    Ok(reqwest::Client::builder()
        .timeout(timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
        .build()?)
}
