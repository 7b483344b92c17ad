//! Deadline-bounded polling.
//!
//! Remote resources (stacks, instances) are observed, not owned: we poll
//! their state until it settles or the deadline passes.

use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Result, WaitError};

/// How long to wait and how often to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Build from whole seconds.
    pub fn from_secs(timeout: u64, interval: u64) -> Self {
        Self::new(Duration::from_secs(timeout), Duration::from_secs(interval))
    }
}

/// Call `check` until it returns `Some`, sleeping `policy.interval` between
/// attempts.
///
/// `check` is always called at least once. Errors from `check` end the wait
/// immediately. The last sleep is cut short so that one final check lands on
/// the deadline; if that check is not ready either the wait fails with
/// [`WaitError::TimedOut`].
pub fn poll_until<T, F>(what: &str, policy: &PollPolicy, mut check: F) -> Result<T>
where
    F: FnMut() -> Result<Option<T>>,
{
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        if let Some(value) = check()? {
            trace!(what, attempt, "wait satisfied");
            return Ok(value);
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.timeout {
            return Err(WaitError::TimedOut {
                what: what.to_string(),
                waited: elapsed,
            }
            .into());
        }

        let nap = policy.interval.min(policy.timeout - elapsed);
        trace!(what, attempt, ?nap, "not ready, sleeping");
        thread::sleep(nap);
    }
}
