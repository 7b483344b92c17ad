//! Test support utilities for spots integration tests.
//!
//! Provides an isolated home directory, in-memory cloud backends, and
//! helpers for running the binary.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod mock;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock::*;

use std::path::PathBuf;
use std::time::Duration;

use spots::core::config::Settings;
use spots::core::wait::PollPolicy;
use tempfile::TempDir;

/// Test environment with an isolated home directory.
///
/// No process-global state is mutated: settings point at the temp home
/// directly and child processes get `HOME` set explicitly.
pub struct Test {
    pub home: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        Self { home }
    }

    /// `~/.ssh` inside the temp home.
    pub fn ssh_dir(&self) -> PathBuf {
        self.home.path().join(".ssh")
    }

    /// Settings with default names and waits that never sleep.
    pub fn settings(&self) -> Settings {
        self.settings_for(KEY_PAIR, STACK)
    }

    pub fn settings_for(&self, key_pair: &str, stack: &str) -> Settings {
        let mut settings = Settings::new(key_pair, stack, self.ssh_dir());
        settings.stack_wait = PollPolicy::new(Duration::from_secs(5), Duration::ZERO);
        settings.instance_wait = PollPolicy::new(Duration::from_secs(5), Duration::ZERO);
        settings
    }
}
