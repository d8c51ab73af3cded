use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::compare::outputs_match;
use crate::error::JudgeError;
use crate::executor::Executor;
use crate::sandbox::SandboxBackend;
use crate::types::{CaseOutcome, ProblemSpec, Verdict};

/// Runs every test case of one problem and folds the results into a Verdict.
///
/// All cases run even after failures. Per-case faults (non-zero exit, time
/// limit) become failing outcomes with diagnostic text in `actual`; only
/// provisioning and backend faults abort the call.
pub(crate) async fn run_cases(
    backend: Arc<dyn SandboxBackend>,
    problem: &ProblemSpec,
    code: &str,
    concurrency: usize,
) -> Result<Verdict, JudgeError> {
    let executor = Executor::new(backend, problem.timeout, problem.mem_limit);
    let executor = &executor;

    // buffered() yields in input order regardless of completion order, so
    // the per-case records line up with the test cases even when the cap
    // allows environments to overlap. Collecting plain Results instead of
    // short-circuiting lets every in-flight case finish its execute call,
    // teardown included, before an error is propagated; cancelling a case
    // mid-run would strand its environment.
    let results: Vec<Result<CaseOutcome, JudgeError>> =
        stream::iter(problem.test_cases.iter())
            .map(|case| async move {
                let actual = executor.execute(code, &case.input).await?;
                let is_passed = outputs_match(&actual, &case.output);
                Ok(CaseOutcome {
                    input: case.input.clone(),
                    expected: case.output.clone(),
                    actual,
                    is_passed,
                })
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

    let mut details = Vec::with_capacity(results.len());
    for result in results {
        details.push(result?);
    }

    let passed = details.iter().filter(|outcome| outcome.is_passed).count();
    Ok(Verdict {
        passed,
        total: details.len(),
        details,
    })
}
