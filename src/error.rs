//! Error types for spots.
//!
//! Every failure in the provisioning workflow is returned as an [`Error`] and
//! handled once, in `main`. Nothing below the CLI layer terminates the process.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Top-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    KeyPair(#[from] KeyPairError),

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Suggestion shown under the error message, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::KeyPair(KeyPairError::ListFailed(_))
            | Error::Stack(StackError::CreateFailed { .. }) => {
                Some("check your AWS credentials and region (AWS_PROFILE, AWS_REGION or --region)")
            }
            Error::KeyPair(KeyPairError::NameRejected { .. }) => {
                Some("pick another name with --key-pair-name")
            }
            Error::Stack(StackError::Failed { .. }) => {
                Some("inspect the stack events in the CloudFormation console")
            }
            Error::Wait(WaitError::TimedOut { .. }) => {
                Some("raise the limit with --stack-timeout or --instance-timeout")
            }
            Error::Lookup(LookupError::NotIpv4(_)) => {
                Some("run from a host that reaches the internet over IPv4")
            }
            Error::Lookup(_) => Some("check your network connection"),
            _ => None,
        }
    }
}

/// An error reported by a remote service.
///
/// `code` carries the service error code (e.g. `DryRunOperation`) when the
/// service returned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_owned),
            message: message.into(),
        }
    }

    /// True if the service returned exactly this error code.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Public address lookup errors.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("public address lookup failed: HTTP {0}")]
    Status(u16),

    #[error("public address lookup failed: {0}")]
    Transport(String),

    #[error("public address lookup returned an unexpected body: {0}")]
    Malformed(String),

    #[error("public address {0} is not IPv4; the SSH ingress rule only takes IPv4 ranges")]
    NotIpv4(String),
}

/// Key pair errors.
#[derive(Debug, Error)]
pub enum KeyPairError {
    #[error("failed to list key pairs: {0}")]
    ListFailed(#[source] RemoteError),

    #[error("key pair name '{name}' rejected: {source}")]
    NameRejected {
        name: String,
        #[source]
        source: RemoteError,
    },

    #[error("dry run for key pair '{0}' was not rejected as expected")]
    DryRunNotRejected(String),

    #[error("failed to create key pair '{name}': {source}")]
    CreateFailed {
        name: String,
        #[source]
        source: RemoteError,
    },

    #[error("no key material returned for key pair '{0}'")]
    MissingKeyMaterial(String),

    #[error("failed to write key file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// CloudFormation stack errors.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create stack '{stack}': {source}")]
    CreateFailed {
        stack: String,
        #[source]
        source: RemoteError,
    },

    #[error("failed to describe stack '{stack}': {source}")]
    DescribeFailed {
        stack: String,
        #[source]
        source: RemoteError,
    },

    #[error("stack '{stack}' entered {status}: {reason}")]
    Failed {
        stack: String,
        status: String,
        reason: String,
    },
}

/// Errors while waiting on a remote resource.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {}s waiting for {what}", .waited.as_secs())]
    TimedOut { what: String, waited: Duration },

    #[error("failed to describe instance '{id}': {source}")]
    DescribeFailed {
        id: String,
        #[source]
        source: RemoteError,
    },

    #[error("instance '{id}' entered state {state} while waiting for running")]
    InstanceFailed { id: String, state: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine home directory")]
    NoHomeDirectory,

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
