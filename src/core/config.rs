//! Run configuration.
//!
//! Resolves command-line values into [`Settings`]: names, template source,
//! key file directory, and wait limits.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::constants;
use crate::core::wait::PollPolicy;
use crate::error::{ConfigError, Result, StackError};

/// Template shipped with the source tree, used when none is installed.
const EMBEDDED_TEMPLATE: &str = include_str!("../../cloud_formation_templates/ec2_template.json");

/// Where the CloudFormation template body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Embedded,
}

impl TemplateSource {
    /// Pick the template: an explicit path, else the one installed next to
    /// the executable, else the embedded copy.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        if let Some(path) = explicit {
            return Self::File(path);
        }

        let installed = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .map(|dir| dir.join(constants::TEMPLATE_RELATIVE_PATH));

        match installed {
            Some(path) if path.is_file() => Self::File(path),
            _ => Self::Embedded,
        }
    }

    /// Read the template body.
    pub fn load(&self) -> Result<String> {
        match self {
            Self::File(path) => {
                debug!(path = %path.display(), "reading template");
                fs::read_to_string(path).map_err(|source| {
                    StackError::TemplateRead {
                        path: path.clone(),
                        source,
                    }
                    .into()
                })
            }
            Self::Embedded => {
                debug!("using embedded template");
                Ok(EMBEDDED_TEMPLATE.to_string())
            }
        }
    }
}

/// Everything one provisioning run needs to know.
#[derive(Debug, Clone)]
pub struct Settings {
    pub key_pair_name: String,
    pub stack_name: String,
    pub template: TemplateSource,
    /// Directory receiving new key files (`~/.ssh`).
    pub ssh_dir: PathBuf,
    pub ssh_user: String,
    pub stack_wait: PollPolicy,
    pub instance_wait: PollPolicy,
}

impl Settings {
    /// Settings with defaults for everything but the names and key directory.
    pub fn new(
        key_pair_name: impl Into<String>,
        stack_name: impl Into<String>,
        ssh_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key_pair_name: key_pair_name.into(),
            stack_name: stack_name.into(),
            template: TemplateSource::Embedded,
            ssh_dir: ssh_dir.into(),
            ssh_user: constants::SSH_USER.to_string(),
            stack_wait: PollPolicy::from_secs(
                constants::STACK_TIMEOUT_SECS,
                constants::STACK_POLL_SECS,
            ),
            instance_wait: PollPolicy::from_secs(
                constants::INSTANCE_TIMEOUT_SECS,
                constants::INSTANCE_POLL_SECS,
            ),
        }
    }

    /// The user's SSH directory (`~/.ssh`).
    pub fn default_ssh_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(constants::SSH_DIR))
    }

    /// Path of the key file for a key pair (`<ssh-dir>/<name>_rsa`).
    pub fn key_file_path(&self, key_pair_name: &str) -> PathBuf {
        self.ssh_dir
            .join(format!("{}{}", key_pair_name, constants::KEY_FILE_SUFFIX))
    }
}
