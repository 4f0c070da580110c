//! Ec2Metadata record and the discovery aggregator.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::client::MetadataClient;
use crate::error::MetadataError;
use crate::field::Field;
use crate::imds;

/// Identifying metadata of the EC2 instance the process runs on.
///
/// Exists only fully populated: a value of this type means every field was
/// fetched successfully within the same discovery attempt. It is a read-only
/// snapshot; nothing mutates it after construction.
///
/// # Example
///
/// ```ignore
/// use ec2_meta::{Ec2Metadata, MetadataError};
///
/// #[tokio::main]
/// async fn main() -> Result<(), MetadataError> {
///     let meta = Ec2Metadata::discover().await?;
///     println!("running on {}", meta.instance_id());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ec2Metadata {
    instance_id: Field,
    instance_type: Field,
    availability_zone: Field,
}

impl Ec2Metadata {
    /// Run one discovery attempt against the well-known IMDS address.
    ///
    /// Probes the metadata service first and short-circuits with
    /// [`MetadataError::NotDetected`] if the host does not look like EC2.
    /// Otherwise fetches instance id, instance type, and availability zone,
    /// in that order, on one shared client. All three must succeed; any
    /// failure drops the fields obtained so far and returns the error, so a
    /// partial record is never observable.
    ///
    /// Each call builds its own transport client and releases it when the
    /// attempt ends, success or failure. There is no retry.
    pub async fn discover() -> Result<Self, MetadataError> {
        Self::discover_with_base_url(crate::client::DEFAULT_BASE_URL).await
    }

    /// Run one discovery attempt against a custom base URL.
    ///
    /// This is primarily useful for testing with mock servers.
    pub async fn discover_with_base_url(base_url: &str) -> Result<Self, MetadataError> {
        let client = MetadataClient::new(base_url)?;

        imds::probe(&client).await?;
        debug!("preflight probe succeeded, host looks like EC2");

        let instance_id = fetch(&client, imds::INSTANCE_ID_PATH).await?;
        let instance_type = fetch(&client, imds::INSTANCE_TYPE_PATH).await?;
        let availability_zone = fetch(&client, imds::AVAILABILITY_ZONE_PATH).await?;

        Ok(Self {
            instance_id,
            instance_type,
            availability_zone,
        })
    }

    /// EC2 instance id, e.g. `i-0abcd1234`.
    pub fn instance_id(&self) -> &Field {
        &self.instance_id
    }

    /// EC2 instance type, e.g. `t3.micro`.
    pub fn instance_type(&self) -> &Field {
        &self.instance_type
    }

    /// Availability zone, e.g. `us-east-1a`.
    pub fn availability_zone(&self) -> &Field {
        &self.availability_zone
    }
}

impl fmt::Display for Ec2Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "instance-id: {}", self.instance_id)?;
        writeln!(f, "instance-type: {}", self.instance_type)?;
        write!(f, "availability-zone: {}", self.availability_zone)
    }
}

async fn fetch(client: &MetadataClient, path: &str) -> Result<Field, MetadataError> {
    imds::fetch_field(client, path).await.map_err(|err| {
        warn!(path, "failed to fetch metadata field: {err}");
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldBuf;

    fn field(s: &str) -> Field {
        let mut buf = FieldBuf::new().unwrap();
        buf.append(s.as_bytes()).unwrap();
        buf.finish().unwrap()
    }

    fn sample() -> Ec2Metadata {
        Ec2Metadata {
            instance_id: field("i-0abcd1234"),
            instance_type: field("t3.micro"),
            availability_zone: field("us-east-1a"),
        }
    }

    #[test]
    fn test_accessors() {
        let meta = sample();
        assert_eq!(meta.instance_id().as_str(), "i-0abcd1234");
        assert_eq!(meta.instance_type().as_str(), "t3.micro");
        assert_eq!(meta.availability_zone().as_str(), "us-east-1a");
    }

    #[test]
    fn test_display_summary() {
        assert_eq!(
            sample().to_string(),
            "instance-id: i-0abcd1234\ninstance-type: t3.micro\navailability-zone: us-east-1a"
        );
    }

    #[test]
    fn test_serialize_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["instance_id"], "i-0abcd1234");
        assert_eq!(json["instance_type"], "t3.micro");
        assert_eq!(json["availability_zone"], "us-east-1a");
    }
}
