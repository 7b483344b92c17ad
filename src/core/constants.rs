//! Constants used throughout spots.
//!
//! Centralizes magic strings and configuration values.

/// Default key pair name.
pub const DEFAULT_KEY_PAIR_NAME: &str = "spots-keypair";

/// Default CloudFormation stack name.
pub const DEFAULT_STACK_NAME: &str = "spots-ec2-stack";

/// Endpoint returning the caller's public address as `{"ip": "..."}`.
pub const PUBLIC_ADDRESS_URL: &str = "https://api64.ipify.org?format=json";

/// Error code EC2 returns when a dry-run request would have succeeded.
pub const DRY_RUN_OPERATION: &str = "DryRunOperation";

/// Provenance tag applied to created key pairs.
pub const PROVENANCE_TAG_KEY: &str = "CreatedBy";

/// Provenance tag value.
pub const PROVENANCE_TAG_VALUE: &str = "spots";

/// Template parameter receiving the key pair name.
pub const PARAM_KEY_NAME: &str = "KeyName";

/// Template parameter receiving the CIDR allowed to reach port 22.
pub const PARAM_SSH_LOCATION: &str = "SSHLocation";

/// Stack output holding the instance id.
pub const OUTPUT_INSTANCE_ID: &str = "InstanceId";

/// Stack output holding the instance public address.
pub const OUTPUT_PUBLIC_IP: &str = "PublicIP";

/// Template location relative to the executable's directory.
pub const TEMPLATE_RELATIVE_PATH: &str = "cloud_formation_templates/ec2_template.json";

/// Key file directory relative to HOME (~/.ssh).
pub const SSH_DIR: &str = ".ssh";

/// Suffix appended to the key pair name to form the key file name.
pub const KEY_FILE_SUFFIX: &str = "_rsa";

/// Login user of the Amazon Linux AMI the template launches.
pub const SSH_USER: &str = "ec2-user";

/// Placeholder printed when the private key was not written by this run.
pub const UNKNOWN_IDENTITY: &str = "<your-private-key>";

/// Stack wait limit, matching the CloudFormation `stack_create_complete` waiter.
pub const STACK_TIMEOUT_SECS: u64 = 3600;

/// Delay between stack status polls.
pub const STACK_POLL_SECS: u64 = 30;

/// Instance wait limit, matching the EC2 `instance_running` waiter.
pub const INSTANCE_TIMEOUT_SECS: u64 = 600;

/// Delay between instance state polls.
pub const INSTANCE_POLL_SECS: u64 = 15;
