use thiserror::Error;

/// Errors that abort a whole judge call.
///
/// Per-test-case problems (non-zero exit, time limit) are never errors: they
/// are folded into the Verdict as failing outcomes with diagnostic text.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// The backend could not provision a fresh execution environment
    /// (daemon unreachable, image missing, container refused to start).
    #[error("failed to provision sandbox environment: {0}")]
    Provision(String),

    /// The backend failed mid-run while feeding stdin, waiting, or
    /// collecting output from an already-provisioned environment.
    #[error("sandbox backend fault: {0}")]
    Backend(String),
}
