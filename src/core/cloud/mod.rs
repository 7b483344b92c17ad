//! Remote services the provisioner talks to.
//!
//! The workflow only sees these traits. [`AwsCloud`] implements them against
//! EC2 and CloudFormation; tests substitute in-memory backends.
//!
//! Every call blocks until the service answers and reports failures as a
//! [`RemoteError`] carrying the service error code, so callers can tell an
//! expected rejection (a dry run) from a real one.

mod aws;
mod lookup;

pub use aws::AwsCloud;
pub use lookup::{parse_address, HttpLookup};

use crate::core::types::{InstanceState, KeyMaterial, StackDescription, StackRequest, Tag};
use crate::error::{RemoteError, Result};

/// Outcome of an accepted `CreateKeyPair` call.
pub type CreateKeyPairResult = std::result::Result<Option<KeyMaterial>, RemoteError>;

/// EC2 key pair management.
pub trait KeyPairs {
    /// Names of every key pair in the account and region.
    fn list_key_pairs(&self) -> std::result::Result<Vec<String>, RemoteError>;

    /// Create a key pair.
    ///
    /// With `dry_run` set the service only checks the request; it answers a
    /// valid one with the `DryRunOperation` error.
    ///
    /// # Returns
    ///
    /// The private key material, if the service returned any.
    fn create_key_pair(&self, name: &str, tags: &[Tag], dry_run: bool) -> CreateKeyPairResult;
}

/// CloudFormation stack management.
pub trait Stacks {
    /// Submit a stack creation request, returning the stack id.
    fn create_stack(&self, request: &StackRequest) -> std::result::Result<String, RemoteError>;

    /// Current status and outputs of a stack.
    fn describe_stack(&self, name: &str) -> std::result::Result<StackDescription, RemoteError>;
}

/// EC2 instance observation.
pub trait Instances {
    /// Current state of an instance, `None` while EC2 does not list it yet.
    fn instance_state(&self, id: &str) -> std::result::Result<Option<InstanceState>, RemoteError>;
}

/// Everything the provisioner needs from the cloud.
pub trait Cloud: KeyPairs + Stacks + Instances {}

impl<T: KeyPairs + Stacks + Instances> Cloud for T {}

/// Resolves the caller's public network address.
pub trait AddressLookup {
    fn public_address(&self) -> Result<String>;
}
