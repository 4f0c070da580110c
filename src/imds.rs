//! EC2 instance metadata service requests: preflight probe and field fetch.

use reqwest::StatusCode;
use tracing::debug;

use crate::client::MetadataClient;
use crate::error::MetadataError;
use crate::field::{Field, FieldBuf};

/// Instance id endpoint path.
pub const INSTANCE_ID_PATH: &str = "instance-id";

/// Instance type endpoint path.
pub const INSTANCE_TYPE_PATH: &str = "instance-type";

/// Availability zone endpoint path.
pub const AVAILABILITY_ZONE_PATH: &str = "placement/availability-zone";

/// Probe the metadata service base path to check if we're running on EC2.
///
/// The response body is discarded without buffering; only the outcome
/// matters. Any transport error, timeout, or status other than 200 maps
/// uniformly to [`MetadataError::NotDetected`] — the probe does not
/// distinguish "not EC2" from a network failure.
pub async fn probe(client: &MetadataClient) -> Result<(), MetadataError> {
    let url = format!("{}/", client.base_url());

    let response = client.inner().get(&url).send().await.map_err(|err| {
        debug!("preflight probe failed: {err}");
        MetadataError::NotDetected
    })?;

    if response.status() == StatusCode::OK {
        Ok(())
    } else {
        debug!(
            status = response.status().as_u16(),
            "preflight probe got non-200 status"
        );
        Err(MetadataError::NotDetected)
    }
}

/// Fetch one metadata field from a path relative to the base URL.
///
/// The caller owns the returned [`Field`]. Success requires a clean
/// transport round trip, status exactly 200, a body below the field
/// capacity, and valid UTF-8 content; anything else yields a typed error
/// and nothing to clean up.
pub async fn fetch_field(client: &MetadataClient, path: &str) -> Result<Field, MetadataError> {
    let url = format!("{}/{}", client.base_url(), path);
    let mut buf = FieldBuf::new()?;

    debug!(%url, "fetching metadata field");
    let response = client.inner().get(&url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(MetadataError::HttpStatus(status.as_u16()));
    }

    buf.recv(response).await?;
    buf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(INSTANCE_ID_PATH, "instance-id");
        assert_eq!(INSTANCE_TYPE_PATH, "instance-type");
        assert_eq!(AVAILABILITY_ZONE_PATH, "placement/availability-zone");
    }
}
