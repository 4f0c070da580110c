//! HTTP client wrapper for metadata service requests.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

/// Fixed timeout applied to every metadata request, probe and fetch alike.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(500);

/// EC2 instance metadata service base URL (link-local, plain HTTP).
pub const DEFAULT_BASE_URL: &str = "http://169.254.169.254/latest/meta-data";

/// User-agent identifying this product to the metadata service.
pub const USER_AGENT: &str = concat!("ec2-meta/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper for one discovery attempt.
///
/// Redirect following is disabled outright: a metadata endpoint that
/// redirects could steer credential-bearing requests to an attacker
/// controlled host, so a 3xx answer is surfaced as a failed status
/// instead of being followed.
///
/// A client is built once per discovery attempt and reused sequentially
/// for the preflight probe and the field fetches. It is not meant to be
/// shared across simultaneous attempts.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    inner: Client,
    base_url: String,
}

impl MetadataClient {
    /// Create a new metadata client for the given base URL.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let inner = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new metadata client against the well-known IMDS address.
    pub fn with_default_base_url() -> Result<Self, reqwest::Error> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_timeout() {
        assert_eq!(REQUEST_TIMEOUT, Duration::from_millis(500));
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(DEFAULT_BASE_URL, "http://169.254.169.254/latest/meta-data");
    }

    #[test]
    fn test_user_agent_names_product() {
        assert!(USER_AGENT.starts_with("ec2-meta/"));
    }

    #[test]
    fn test_client_creation() {
        let client = MetadataClient::with_default_base_url().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = MetadataClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
