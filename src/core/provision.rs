//! The provisioning workflow.
//!
//! One run takes one of two branches, chosen once by whether the key pair
//! already exists:
//!
//! - **existing pair**: create stack, wait, read outputs, wait for instance
//! - **new pair**: validate name (dry run), create pair, write key file,
//!   then as above
//!
//! Nothing is rolled back. A failure after the key pair was created leaves
//! the pair and its key file in place.

use std::net::IpAddr;
use std::path::PathBuf;

use tracing::{debug, error, info, info_span, warn, Span};

use crate::core::cloud::{AddressLookup, Cloud};
use crate::core::config::Settings;
use crate::core::constants::{
    DRY_RUN_OPERATION, PARAM_KEY_NAME, PARAM_SSH_LOCATION, PROVENANCE_TAG_KEY,
    PROVENANCE_TAG_VALUE,
};
use crate::core::keyfile;
use crate::core::types::{
    Connection, InstanceInfo, InstanceState, KeyMaterial, StackRequest, StackState, Tag,
};
use crate::core::wait::poll_until;
use crate::error::{KeyPairError, LookupError, Result, StackError, WaitError};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub connection: Connection,
    /// True if this run created the key pair.
    pub created_key_pair: bool,
}

/// Drives one provisioning run against a cloud backend.
pub struct Provisioner<'a, C: Cloud, L: AddressLookup> {
    cloud: &'a C,
    lookup: &'a L,
    settings: &'a Settings,
    span: Span,
}

impl<'a, C: Cloud, L: AddressLookup> Provisioner<'a, C, L> {
    pub fn new(cloud: &'a C, lookup: &'a L, settings: &'a Settings) -> Self {
        let span = info_span!(
            "provision",
            stack = %settings.stack_name,
            key_pair = %settings.key_pair_name
        );
        Self {
            cloud,
            lookup,
            settings,
            span,
        }
    }

    /// Run the whole workflow.
    pub fn run(&self) -> Result<Provisioned> {
        let _entered = self.span.enter();
        let name = self.settings.key_pair_name.as_str();
        let stack = self.settings.stack_name.as_str();

        let address = self.resolve_public_address()?;

        let (key_pair, identity) = if self.key_pair_exists(name)? {
            info!(key_pair = %name, "found existing key pair, using it for stack creation");
            (name.to_string(), None)
        } else {
            info!(key_pair = %name, "key pair not found, creating it");
            let valid = self.validate_key_pair_name(name)?;
            let material = self.create_key_pair(&valid)?;
            let path = self.persist_key_file(&valid, &material)?;
            (valid, Some(path))
        };
        let created_key_pair = identity.is_some();

        let connection = self
            .launch(&key_pair, &address, stack, identity)
            .inspect_err(|_| {
                if created_key_pair {
                    warn!(
                        key_pair = %key_pair,
                        key_file = %self.settings.key_file_path(&key_pair).display(),
                        "key pair and key file created by this run were left in place"
                    );
                }
            })?;
        info!(command = %connection.command(), "instance ready");

        Ok(Provisioned {
            connection,
            created_key_pair,
        })
    }

    /// Stack creation onwards: shared tail of both branches.
    fn launch(
        &self,
        key_pair: &str,
        address: &str,
        stack: &str,
        identity: Option<PathBuf>,
    ) -> Result<Connection> {
        self.create_stack(key_pair, address, stack)?;
        let instance = self.read_stack_outputs(stack)?;
        self.await_instance_running(&instance.id)?;

        Ok(Connection {
            user: self.settings.ssh_user.clone(),
            host: instance.ip,
            instance_id: instance.id,
            identity,
        })
    }

    /// The caller's public IPv4 address as seen from the internet.
    ///
    /// The template's `SSHLocation` is an IPv4 CIDR, so an IPv6 answer is
    /// rejected here, before anything is created.
    pub fn resolve_public_address(&self) -> Result<String> {
        let address = self.lookup.public_address()?;
        match address.parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => {}
            Ok(IpAddr::V6(_)) => return Err(LookupError::NotIpv4(address).into()),
            Err(_) => return Err(LookupError::Malformed(address).into()),
        }
        debug!(address = %address, "resolved public address");
        Ok(address)
    }

    /// True iff a key pair named exactly `name` exists.
    pub fn key_pair_exists(&self, name: &str) -> Result<bool> {
        let names = self
            .cloud
            .list_key_pairs()
            .map_err(KeyPairError::ListFailed)?;
        Ok(names.iter().any(|existing| existing == name))
    }

    /// Check that `name` is acceptable without creating anything.
    ///
    /// EC2 answers an acceptable dry run with the `DryRunOperation` error;
    /// that is the only outcome treated as success.
    pub fn validate_key_pair_name(&self, name: &str) -> Result<String> {
        match self.cloud.create_key_pair(name, &provenance_tags(), true) {
            Err(err) if err.has_code(DRY_RUN_OPERATION) => {
                debug!(key_pair = %name, "key pair name is valid");
                Ok(name.to_string())
            }
            Err(source) => {
                error!(key_pair = %name, error = %source, "key pair name rejected");
                Err(KeyPairError::NameRejected {
                    name: name.to_string(),
                    source,
                }
                .into())
            }
            Ok(_) => {
                error!(key_pair = %name, "dry run was not rejected");
                Err(KeyPairError::DryRunNotRejected(name.to_string()).into())
            }
        }
    }

    /// Create the key pair and return its private key material.
    pub fn create_key_pair(&self, name: &str) -> Result<KeyMaterial> {
        let material = self
            .cloud
            .create_key_pair(name, &provenance_tags(), false)
            .map_err(|source| {
                error!(key_pair = %name, error = %source, "key pair creation failed");
                KeyPairError::CreateFailed {
                    name: name.to_string(),
                    source,
                }
            })?
            .ok_or_else(|| KeyPairError::MissingKeyMaterial(name.to_string()))?;

        info!(key_pair = %name, "key pair created");
        Ok(material)
    }

    /// Write the private key to `<ssh-dir>/<name>_rsa`.
    pub fn persist_key_file(&self, name: &str, material: &str) -> Result<PathBuf> {
        let path = self.settings.key_file_path(name);
        keyfile::write_key_file(&path, material)?;
        info!(path = %path.display(), "key file written");
        Ok(path)
    }

    /// Submit the stack and block until it is `CREATE_COMPLETE`.
    ///
    /// SSH ingress is restricted to `public_address/32`.
    pub fn create_stack(
        &self,
        key_pair_name: &str,
        public_address: &str,
        stack_name: &str,
    ) -> Result<()> {
        let request = StackRequest {
            stack_name: stack_name.to_string(),
            template_body: self.settings.template.load()?,
            parameters: vec![
                (PARAM_KEY_NAME.to_string(), key_pair_name.to_string()),
                (PARAM_SSH_LOCATION.to_string(), format!("{}/32", public_address)),
            ],
        };

        let stack_id = self
            .cloud
            .create_stack(&request)
            .map_err(|source| StackError::CreateFailed {
                stack: stack_name.to_string(),
                source,
            })?;
        debug!(stack_id = %stack_id, "stack submitted");

        info!(stack = %stack_name, "waiting for stack to be ready");
        let what = format!("stack '{}'", stack_name);
        poll_until(&what, &self.settings.stack_wait, || {
            let description = self.cloud.describe_stack(stack_name).map_err(|source| {
                StackError::DescribeFailed {
                    stack: stack_name.to_string(),
                    source,
                }
            })?;
            match description.state() {
                StackState::Complete => Ok(Some(())),
                StackState::Creating => Ok(None),
                StackState::Failed { status, reason } => Err(StackError::Failed {
                    stack: stack_name.to_string(),
                    status,
                    reason,
                }
                .into()),
            }
        })?;

        info!(stack = %stack_name, "stack creation complete");
        Ok(())
    }

    /// Instance id and public address from the stack outputs.
    ///
    /// Missing outputs come back as empty strings.
    pub fn read_stack_outputs(&self, stack_name: &str) -> Result<InstanceInfo> {
        let description = self
            .cloud
            .describe_stack(stack_name)
            .map_err(|source| StackError::DescribeFailed {
                stack: stack_name.to_string(),
                source,
            })?;

        let info = InstanceInfo::from_outputs(&description.outputs);
        if info.is_incomplete() {
            warn!(
                stack = %stack_name,
                instance_id = %info.id,
                public_ip = %info.ip,
                "stack is missing the InstanceId or PublicIP output"
            );
        }
        Ok(info)
    }

    /// Block until the instance is `running`.
    pub fn await_instance_running(&self, instance_id: &str) -> Result<()> {
        info!(instance_id = %instance_id, "waiting for instance to be running");
        let what = format!("instance '{}'", instance_id);

        poll_until(&what, &self.settings.instance_wait, || {
            let state = self.cloud.instance_state(instance_id).map_err(|source| {
                WaitError::DescribeFailed {
                    id: instance_id.to_string(),
                    source,
                }
            })?;
            match state {
                Some(InstanceState::Running) => Ok(Some(())),
                Some(state) if state.is_terminal() => Err(WaitError::InstanceFailed {
                    id: instance_id.to_string(),
                    state: state.to_string(),
                }
                .into()),
                _ => Ok(None),
            }
        })?;

        info!(instance_id = %instance_id, "instance running");
        Ok(())
    }
}

fn provenance_tags() -> Vec<Tag> {
    vec![Tag::new(PROVENANCE_TAG_KEY, PROVENANCE_TAG_VALUE)]
}
