//! Scripted command runner for tests

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::command::{CommandOutput, CommandRunner};
use crate::error::{ProvisionError, ProvisionResult};

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<ProvisionResult<CommandOutput>>,
    calls: Vec<Vec<String>>,
    timeouts: Vec<Duration>,
    profiles: Vec<Option<String>>,
}

/// Runner that replays queued responses in order and records every call.
///
/// When the queue runs dry it answers with exit code 1. For `add profile`
/// calls the referenced file is read at call time and kept, so tests can
/// inspect what netsh would have seen.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    inner: Arc<Mutex<MockState>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, response: ProvisionResult<CommandOutput>) -> &Self {
        self.inner.lock().unwrap().responses.push_back(response);
        self
    }

    pub fn push_ok(&self, stdout: &str) -> &Self {
        self.push(Ok(output(0, stdout, "")))
    }

    pub fn push_exit(&self, code: i32, stderr: &str) -> &Self {
        self.push(Ok(output(code, "", stderr)))
    }

    pub fn push_timeout(&self) -> &Self {
        self.push(Err(ProvisionError::CommandTimeout))
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.inner.lock().unwrap().timeouts.clone()
    }

    /// Number of recorded calls whose leading arguments equal `prefix`.
    pub fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.len() >= prefix.len() && call.iter().zip(prefix).all(|(a, b)| a == b))
            .count()
    }

    /// Profile file contents seen by each `add profile` call.
    pub fn profiles(&self) -> Vec<Option<String>> {
        self.inner.lock().unwrap().profiles.clone()
    }
}

pub fn output(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

impl CommandRunner for MockRunner {
    async fn run(&self, args: &[&str], timeout: Duration) -> ProvisionResult<CommandOutput> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(args.iter().map(|a| a.to_string()).collect());
        state.timeouts.push(timeout);

        if args.starts_with(&["add", "profile"]) {
            let seen = args
                .iter()
                .find_map(|a| a.strip_prefix("filename="))
                .and_then(|path| std::fs::read_to_string(Path::new(path)).ok());
            state.profiles.push(seen);
        }

        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(output(1, "", "")))
    }
}
