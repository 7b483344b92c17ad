//! Core library components.
//!
//! This module contains the provisioning workflow and everything it talks to:
//! cloud backends, key file storage, configuration, and waiting.

pub mod cloud;
pub mod config;
pub mod constants;
pub mod keyfile;
pub mod provision;
pub mod types;
pub mod wait;
