use std::sync::Arc;

use crate::error::JudgeError;
use crate::runner;
use crate::sandbox::SandboxBackend;
use crate::types::{ProblemSpec, Verdict};

/// Sequential baseline: one live environment at a time.
const DEFAULT_CONCURRENCY: usize = 1;

/// Entry point for external callers.
///
/// Owns nothing beyond the injected backend handle and the concurrency cap;
/// problem definitions and submitted code arrive per call.
pub struct Judge {
    backend: Arc<dyn SandboxBackend>,
    concurrency: usize,
}

impl Judge {
    pub fn new(backend: Arc<dyn SandboxBackend>) -> Self {
        Self {
            backend,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Allow up to `cap` test cases to run in overlapping environments.
    ///
    /// Verdict order still follows test case order. Unbounded fan-out is not
    /// offered: parallel environment creation exhausts host resources.
    pub fn with_concurrency(mut self, cap: usize) -> Self {
        self.concurrency = cap.max(1);
        self
    }

    /// Judge `code` against `problem`, running every test case in order.
    ///
    /// Always produces a complete Verdict unless the sandbox backend itself
    /// fails, in which case no partial result is returned.
    pub async fn judge(&self, problem: &ProblemSpec, code: &str) -> Result<Verdict, JudgeError> {
        runner::run_cases(Arc::clone(&self.backend), problem, code, self.concurrency).await
    }
}
