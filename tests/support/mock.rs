//! In-memory cloud backends.
//!
//! `MockCloud` answers from canned data and records every call so tests can
//! assert what the workflow asked for and in which order.

use std::cell::RefCell;
use std::collections::VecDeque;

use spots::core::cloud::{AddressLookup, CreateKeyPairResult, Instances, KeyPairs, Stacks};
use spots::core::types::{InstanceState, StackDescription, StackOutput, StackRequest, Tag};
use spots::error::{LookupError, RemoteError, Result};
use zeroize::Zeroizing;

use super::fixtures::*;

/// A call made against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListKeyPairs,
    CreateKeyPair {
        name: String,
        tags: Vec<Tag>,
        dry_run: bool,
    },
    CreateStack(StackRequest),
    DescribeStack(String),
    InstanceState(String),
}

/// How the mock answers a dry-run `CreateKeyPair`.
#[derive(Debug, Clone)]
pub enum DryRun {
    /// Rejected with this error code (`DryRunOperation` means valid).
    Rejected(String),
    /// Accepted without error.
    Accepted,
}

pub struct MockCloud {
    pub key_pairs: Vec<String>,
    pub dry_run: DryRun,
    pub create_error: Option<RemoteError>,
    pub key_material: Option<String>,
    pub create_stack_error: Option<RemoteError>,
    /// Status per `DescribeStacks` call; the last one repeats.
    pub stack_statuses: RefCell<VecDeque<(String, Option<String>)>>,
    pub outputs: Vec<StackOutput>,
    /// State per `DescribeInstances` call; the last one repeats.
    pub instance_states: RefCell<VecDeque<Option<InstanceState>>>,
    pub calls: RefCell<Vec<Call>>,
}

impl Default for MockCloud {
    fn default() -> Self {
        Self {
            key_pairs: Vec::new(),
            dry_run: DryRun::Rejected("DryRunOperation".to_string()),
            create_error: None,
            key_material: Some(KEY_MATERIAL.to_string()),
            create_stack_error: None,
            stack_statuses: RefCell::new(VecDeque::from([
                ("CREATE_IN_PROGRESS".to_string(), None),
                ("CREATE_COMPLETE".to_string(), None),
            ])),
            outputs: vec![
                StackOutput::new("InstanceId", INSTANCE_ID),
                StackOutput::new("PublicIP", INSTANCE_IP),
            ],
            instance_states: RefCell::new(VecDeque::from([
                None,
                Some(InstanceState::Pending),
                Some(InstanceState::Running),
            ])),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl MockCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose account already holds these key pairs.
    pub fn with_key_pairs(names: &[&str]) -> Self {
        Self {
            key_pairs: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_stack_statuses(self, statuses: &[(&str, Option<&str>)]) -> Self {
        *self.stack_statuses.borrow_mut() = statuses
            .iter()
            .map(|(s, r)| (s.to_string(), r.map(str::to_owned)))
            .collect();
        self
    }

    pub fn with_instance_states(self, states: Vec<Option<InstanceState>>) -> Self {
        *self.instance_states.borrow_mut() = states.into();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Every stack creation request received.
    pub fn stack_requests(&self) -> Vec<StackRequest> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::CreateStack(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every key pair creation (dry run or not) received.
    pub fn key_pair_creations(&self) -> Vec<(String, bool)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::CreateKeyPair { name, dry_run, .. } => Some((name.clone(), *dry_run)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

/// Pop the next item, repeating the last one forever.
fn next_repeating<T: Clone>(queue: &RefCell<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.borrow_mut();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl KeyPairs for MockCloud {
    fn list_key_pairs(&self) -> std::result::Result<Vec<String>, RemoteError> {
        self.record(Call::ListKeyPairs);
        Ok(self.key_pairs.clone())
    }

    fn create_key_pair(&self, name: &str, tags: &[Tag], dry_run: bool) -> CreateKeyPairResult {
        self.record(Call::CreateKeyPair {
            name: name.to_string(),
            tags: tags.to_vec(),
            dry_run,
        });

        if dry_run {
            return match &self.dry_run {
                DryRun::Rejected(code) => Err(RemoteError::new(
                    Some(code.as_str()),
                    "Request would have succeeded, but DryRun flag is set.",
                )),
                DryRun::Accepted => Ok(None),
            };
        }

        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        Ok(self.key_material.clone().map(Zeroizing::new))
    }
}

impl Stacks for MockCloud {
    fn create_stack(&self, request: &StackRequest) -> std::result::Result<String, RemoteError> {
        self.record(Call::CreateStack(request.clone()));
        if let Some(err) = &self.create_stack_error {
            return Err(err.clone());
        }
        Ok(format!(
            "arn:aws:cloudformation:us-east-1:123456789012:stack/{}/1",
            request.stack_name
        ))
    }

    fn describe_stack(&self, name: &str) -> std::result::Result<StackDescription, RemoteError> {
        self.record(Call::DescribeStack(name.to_string()));
        let (status, reason) = next_repeating(&self.stack_statuses)
            .ok_or_else(|| RemoteError::new(Some("ValidationError"), "Stack does not exist"))?;
        Ok(StackDescription {
            status,
            reason,
            outputs: self.outputs.clone(),
        })
    }
}

impl Instances for MockCloud {
    fn instance_state(&self, id: &str) -> std::result::Result<Option<InstanceState>, RemoteError> {
        self.record(Call::InstanceState(id.to_string()));
        Ok(next_repeating(&self.instance_states).flatten())
    }
}

/// Address lookup returning a fixed answer.
pub struct MockLookup {
    pub address: Option<String>,
}

impl MockLookup {
    pub fn new(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { address: None }
    }
}

impl Default for MockLookup {
    fn default() -> Self {
        Self::new(ADDRESS)
    }
}

impl AddressLookup for MockLookup {
    fn public_address(&self) -> Result<String> {
        self.address
            .clone()
            .ok_or_else(|| LookupError::Transport("network unreachable".to_string()).into())
    }
}
