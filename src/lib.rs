//! Spots - Provision an EC2 instance through CloudFormation and get an ssh
//! command back.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── output        # Terminal output helpers
//! │   └── provision     # Wire settings and AWS together, print the result
//! ├── core/             # Core library components
//! │   ├── cloud/        # Remote service traits
//! │   │   ├── aws       # EC2 + CloudFormation via the AWS SDK
//! │   │   └── lookup    # Public address lookup over HTTPS
//! │   ├── config        # Run settings and template resolution
//! │   ├── keyfile       # Owner-only private key files
//! │   ├── provision     # The two-branch workflow
//! │   ├── types         # Stack, instance and connection types
//! │   └── wait          # Deadline-bounded polling
//! └── error             # Error types
//! ```

pub mod cli;
pub mod core;
pub mod error;
