//! Domain types shared by the workflow and the cloud backends.

use std::fmt;
use std::path::PathBuf;

use zeroize::Zeroizing;

use super::constants::{OUTPUT_INSTANCE_ID, OUTPUT_PUBLIC_IP, UNKNOWN_IDENTITY};

/// Private key material returned once, at key pair creation.
///
/// Wiped from memory on drop.
pub type KeyMaterial = Zeroizing<String>;

/// A resource tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A CloudFormation stack creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    pub stack_name: String,
    pub template_body: String,
    /// Ordered (key, value) parameters.
    pub parameters: Vec<(String, String)>,
}

impl StackRequest {
    /// Look up a parameter value by key.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One declared stack output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub key: String,
    pub value: String,
}

impl StackOutput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// What `DescribeStacks` told us about one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDescription {
    /// Raw status, e.g. `CREATE_IN_PROGRESS`.
    pub status: String,
    pub reason: Option<String>,
    pub outputs: Vec<StackOutput>,
}

/// Where a stack stands with respect to creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackState {
    Creating,
    Complete,
    Failed { status: String, reason: String },
}

impl StackState {
    /// Classify a raw CloudFormation stack status.
    ///
    /// Anything other than the in-progress states or `CREATE_COMPLETE`
    /// (failure, rollback, deletion) means creation will not complete.
    pub fn from_status(status: &str, reason: Option<&str>) -> Self {
        match status {
            "CREATE_COMPLETE" => Self::Complete,
            "CREATE_IN_PROGRESS" | "REVIEW_IN_PROGRESS" => Self::Creating,
            other => Self::Failed {
                status: other.to_string(),
                reason: reason.unwrap_or("no reason given").to_string(),
            },
        }
    }
}

impl StackDescription {
    pub fn state(&self) -> StackState {
        StackState::from_status(&self.status, self.reason.as_deref())
    }
}

/// Instance id and public address read from the stack outputs.
///
/// Either field is empty if the stack did not declare the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceInfo {
    pub id: String,
    pub ip: String,
}

impl InstanceInfo {
    /// Pick the `InstanceId` and `PublicIP` outputs, ignoring all others.
    pub fn from_outputs(outputs: &[StackOutput]) -> Self {
        let mut info = Self::default();
        for output in outputs {
            match output.key.as_str() {
                OUTPUT_INSTANCE_ID => info.id = output.value.clone(),
                OUTPUT_PUBLIC_IP => info.ip = output.value.clone(),
                _ => {}
            }
        }
        info
    }

    /// True if either output was missing.
    pub fn is_incomplete(&self) -> bool {
        self.id.is_empty() || self.ip.is_empty()
    }
}

/// EC2 instance lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    Other(String),
}

impl InstanceState {
    /// Parse the EC2 state name.
    pub fn parse(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }

    /// States from which the instance will not reach `running` on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ShuttingDown | Self::Terminated | Self::Stopping | Self::Stopped
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to log into the provisioned instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub user: String,
    pub host: String,
    pub instance_id: String,
    /// Key file written by this run, if any.
    pub identity: Option<PathBuf>,
}

impl Connection {
    /// The `ssh` command line to reach the instance.
    pub fn command(&self) -> String {
        let identity = match &self.identity {
            Some(path) => path.display().to_string(),
            None => UNKNOWN_IDENTITY.to_string(),
        };
        format!("ssh -i {} {}@{}", identity, self.user, self.host)
    }
}
