use serde::{Deserialize, Serialize};

/// One test case: input fed to the program's stdin, expected stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    /// Expected standard output. Named `output` on the wire.
    pub output: String,
}

/// Immutable definition of one gradable task, supplied by problem storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSpec {
    /// Display label; not used for judging logic.
    pub name: String,
    /// Wall-clock limit per test case, in seconds. Must be > 0.
    pub timeout: u64,
    /// Memory ceiling per test case, in MiB. Must be > 0.
    pub mem_limit: u64,
    pub test_cases: Vec<TestCase>,
}

/// Result of running the submission against one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub input: String,
    pub expected: String,
    /// Trimmed stdout on a clean exit, or a diagnostic string on a
    /// non-zero exit or time limit.
    pub actual: String,
    pub is_passed: bool,
}

/// Aggregate result for one (problem, submission) pair. The only value
/// external callers receive, persist, or display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: usize,
    pub total: usize,
    /// Per-case records, in the same order as the problem's test cases.
    pub details: Vec<CaseOutcome>,
}

impl Verdict {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}
