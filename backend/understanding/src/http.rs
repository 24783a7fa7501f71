//! Outbound HTTP client construction.

use std::time::Duration;

use reqwest::Client;
use textgrab_core::{Result, TextGrabError};

/// A client whose requests fail after `timeout`.
pub(crate) fn client_with_timeout(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| TextGrabError::Config(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_timeout() {
        assert!(client_with_timeout(Duration::from_secs(5)).is_ok());
    }
}
