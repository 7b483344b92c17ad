//! Command-line interface.

pub mod output;
pub mod provision;

use std::path::PathBuf;

use clap::Parser;

use crate::core::constants::{
    DEFAULT_KEY_PAIR_NAME, DEFAULT_STACK_NAME, INSTANCE_TIMEOUT_SECS, STACK_TIMEOUT_SECS,
};

/// Spots - Provision an EC2 instance through CloudFormation.
#[derive(Parser, Debug)]
#[command(
    name = "spots",
    about = "Provision an EC2 instance through CloudFormation and print how to ssh into it",
    version
)]
pub struct Cli {
    /// New or existing key pair name to be used for the EC2 stack
    #[arg(long, env = "SPOTS_KEY_PAIR_NAME", default_value = DEFAULT_KEY_PAIR_NAME)]
    pub key_pair_name: String,

    /// Name of the stack to create
    #[arg(long, env = "SPOTS_STACK_NAME", default_value = DEFAULT_STACK_NAME)]
    pub stack_name: String,

    /// CloudFormation template (defaults to the one installed with spots)
    #[arg(long, env = "SPOTS_TEMPLATE", value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// AWS region (defaults to the AWS config / environment)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS shared config profile
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Seconds to wait for the stack to finish creating
    #[arg(
        long,
        env = "SPOTS_STACK_TIMEOUT",
        value_name = "SECS",
        default_value_t = STACK_TIMEOUT_SECS
    )]
    pub stack_timeout: u64,

    /// Seconds to wait for the instance to be running
    #[arg(
        long,
        env = "SPOTS_INSTANCE_TIMEOUT",
        value_name = "SECS",
        default_value_t = INSTANCE_TIMEOUT_SECS
    )]
    pub instance_timeout: u64,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Execute the provisioning run.
pub fn execute(cli: Cli) -> crate::error::Result<()> {
    provision::execute(cli)
}
