//! Provision command.

use tracing::debug;

use super::output;
use super::Cli;
use crate::core::cloud::{AwsCloud, HttpLookup};
use crate::core::config::{Settings, TemplateSource};
use crate::core::constants::{INSTANCE_POLL_SECS, STACK_POLL_SECS};
use crate::core::provision::{Provisioned, Provisioner};
use crate::core::wait::PollPolicy;
use crate::error::Result;

/// Build run settings from the command line.
pub fn settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::new(
        &cli.key_pair_name,
        &cli.stack_name,
        Settings::default_ssh_dir()?,
    );
    settings.template = TemplateSource::resolve(cli.template.clone());
    settings.stack_wait = PollPolicy::from_secs(cli.stack_timeout, STACK_POLL_SECS);
    settings.instance_wait = PollPolicy::from_secs(cli.instance_timeout, INSTANCE_POLL_SECS);
    Ok(settings)
}

/// Provision the stack and print the ssh command.
pub fn execute(cli: Cli) -> Result<()> {
    let settings = settings(&cli)?;
    debug!(?settings, "resolved settings");

    let cloud = AwsCloud::connect(cli.region.as_deref(), cli.profile.as_deref())?;
    let lookup = HttpLookup::default();

    let provisioned = Provisioner::new(&cloud, &lookup, &settings).run()?;
    report(&settings, &provisioned);
    Ok(())
}

fn report(settings: &Settings, provisioned: &Provisioned) {
    let connection = &provisioned.connection;

    output::success(&format!("stack {} ready", output::key(&settings.stack_name)));
    output::kv("instance:", &connection.instance_id);
    output::kv("address: ", &connection.host);
    match &connection.identity {
        Some(path) => output::kv("key file:", output::path(&path.display().to_string())),
        None => output::kv("key pair:", &settings.key_pair_name),
    }

    println!();
    output::hint(&format!("connect with: {}", output::cmd(&connection.command())));
}
