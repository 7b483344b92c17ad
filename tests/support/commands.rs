//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;

impl Test {
    /// Create a spots command isolated from the caller's environment.
    ///
    /// HOME points at the temp home and the SPOTS_* / AWS_* variables that
    /// feed CLI defaults are cleared.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("spots").expect("failed to find spots binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        for var in [
            "SPOTS_KEY_PAIR_NAME",
            "SPOTS_STACK_NAME",
            "SPOTS_TEMPLATE",
            "SPOTS_STACK_TIMEOUT",
            "SPOTS_INSTANCE_TIMEOUT",
            "SPOTS_LOG",
            "AWS_REGION",
            "AWS_PROFILE",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }
}
