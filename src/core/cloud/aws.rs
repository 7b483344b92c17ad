//! AWS backend: EC2 and CloudFormation through the AWS SDK.
//!
//! Credentials and region come from the default provider chain
//! (AWS_PROFILE, AWS_REGION, ~/.aws/config, instance metadata, ...), with
//! optional overrides from the command line.
//!
//! The SDK is async; the workflow is not. `AwsCloud` owns a current-thread
//! tokio runtime and blocks on each request.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudformation as cloudformation;
use aws_sdk_ec2 as ec2;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata};
use tokio::runtime::Runtime;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{CreateKeyPairResult, Instances, KeyPairs, Stacks};
use crate::core::types::{InstanceState, StackDescription, StackOutput, StackRequest, Tag};
use crate::error::{ConfigError, RemoteError, Result};

/// Convert an SDK error into a [`RemoteError`], keeping the service code.
fn remote_error<E>(err: E) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = err
        .message()
        .map(str::to_owned)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    RemoteError::new(err.code(), message)
}

/// EC2 + CloudFormation clients sharing one SDK config.
pub struct AwsCloud {
    rt: Runtime,
    ec2: ec2::Client,
    cloudformation: cloudformation::Client,
}

impl AwsCloud {
    /// Load the AWS config and build the service clients.
    pub fn connect(region: Option<&str>, profile: Option<&str>) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ConfigError::Runtime)?;

        let config = rt.block_on(async {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(Region::new(region.to_string()));
            }
            if let Some(profile) = profile {
                loader = loader.profile_name(profile);
            }
            loader.load().await
        });

        debug!(region = ?config.region(), "loaded AWS config");

        Ok(Self {
            ec2: ec2::Client::new(&config),
            cloudformation: cloudformation::Client::new(&config),
            rt,
        })
    }
}

impl KeyPairs for AwsCloud {
    fn list_key_pairs(&self) -> std::result::Result<Vec<String>, RemoteError> {
        // DescribeKeyPairs is not paginated: one response lists every pair.
        let output = self
            .rt
            .block_on(self.ec2.describe_key_pairs().send())
            .map_err(remote_error)?;

        let names: Vec<String> = output
            .key_pairs()
            .iter()
            .filter_map(|pair| pair.key_name())
            .map(str::to_owned)
            .collect();
        trace!(count = names.len(), "listed key pairs");
        Ok(names)
    }

    fn create_key_pair(&self, name: &str, tags: &[Tag], dry_run: bool) -> CreateKeyPairResult {
        let tags = tags
            .iter()
            .map(|tag| {
                ec2::types::Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build()
            })
            .collect();
        let spec = ec2::types::TagSpecification::builder()
            .resource_type(ec2::types::ResourceType::KeyPair)
            .set_tags(Some(tags))
            .build();

        let output = self
            .rt
            .block_on(
                self.ec2
                    .create_key_pair()
                    .key_name(name)
                    .dry_run(dry_run)
                    .tag_specifications(spec)
                    .send(),
            )
            .map_err(remote_error)?;

        trace!(key_pair = %name, fingerprint = ?output.key_fingerprint(), "key pair created");
        Ok(output
            .key_material()
            .map(|material| Zeroizing::new(material.to_string())))
    }
}

impl Stacks for AwsCloud {
    fn create_stack(&self, request: &StackRequest) -> std::result::Result<String, RemoteError> {
        let parameters = request
            .parameters
            .iter()
            .map(|(key, value)| {
                cloudformation::types::Parameter::builder()
                    .parameter_key(key)
                    .parameter_value(value)
                    .build()
            })
            .collect();

        let output = self
            .rt
            .block_on(
                self.cloudformation
                    .create_stack()
                    .stack_name(&request.stack_name)
                    .template_body(&request.template_body)
                    .set_parameters(Some(parameters))
                    .send(),
            )
            .map_err(remote_error)?;

        Ok(output.stack_id().unwrap_or_default().to_string())
    }

    fn describe_stack(&self, name: &str) -> std::result::Result<StackDescription, RemoteError> {
        let output = self
            .rt
            .block_on(self.cloudformation.describe_stacks().stack_name(name).send())
            .map_err(remote_error)?;

        let stack = output
            .stacks()
            .first()
            .ok_or_else(|| RemoteError::new(None, format!("stack {} not found", name)))?;

        Ok(StackDescription {
            status: stack
                .stack_status()
                .map(|status| status.as_str().to_string())
                .unwrap_or_default(),
            reason: stack.stack_status_reason().map(str::to_owned),
            outputs: stack
                .outputs()
                .iter()
                .filter_map(|o| Some(StackOutput::new(o.output_key()?, o.output_value()?)))
                .collect(),
        })
    }
}

impl Instances for AwsCloud {
    fn instance_state(&self, id: &str) -> std::result::Result<Option<InstanceState>, RemoteError> {
        let filter = ec2::types::Filter::builder()
            .name("instance-id")
            .values(id)
            .build();

        let output = self
            .rt
            .block_on(self.ec2.describe_instances().filters(filter).send())
            .map_err(remote_error)?;

        Ok(output
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .find_map(|instance| instance.state().and_then(|state| state.name()))
            .map(|name| InstanceState::parse(name.as_str())))
    }
}
