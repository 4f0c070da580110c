//! EC2 instance metadata discovery for monitoring daemons.
//!
//! This crate answers one question — is this host an AWS EC2 instance? —
//! and, if so, retrieves three identifying fields (instance id, instance
//! type, availability zone) from the instance metadata service so that a
//! monitoring daemon can tag emitted telemetry with cloud-topology context.
//!
//! # Features
//!
//! - Cheap preflight probe before any real data is fetched
//! - Bounded field buffers: oversized responses are rejected, never truncated
//! - Strict per-request 500 ms timeout and zero-redirect policy
//! - All-or-nothing discovery: either a fully populated [`Ec2Metadata`]
//!   record or a typed error, never a partial record
//!
//! # Example
//!
//! ```ignore
//! use ec2_meta::{Ec2Metadata, MetadataError};
//!
//! #[tokio::main]
//! async fn main() {
//!     match Ec2Metadata::discover().await {
//!         Ok(meta) => println!(
//!             "EC2 instance {} ({}) in {}",
//!             meta.instance_id(),
//!             meta.instance_type(),
//!             meta.availability_zone(),
//!         ),
//!         // not fatal: the daemon simply runs without cloud metadata tags
//!         Err(MetadataError::NotDetected) => println!("not on EC2"),
//!         Err(err) => eprintln!("discovery failed: {err}"),
//!     }
//! }
//! ```
//!
//! # Hardening
//!
//! The metadata endpoint serves instance-scoped secrets, so redirects are
//! never followed (a redirecting endpoint is treated as a failure) and each
//! field is capped at [`FIELD_CAPACITY`] bytes.

mod client;
mod error;
mod field;
mod imds;
mod metadata;

pub use client::{MetadataClient, DEFAULT_BASE_URL, REQUEST_TIMEOUT, USER_AGENT};
pub use error::MetadataError;
pub use field::{Field, FIELD_CAPACITY};
pub use metadata::Ec2Metadata;
