use async_trait::async_trait;

use crate::error::JudgeError;

/// Creation-time configuration for one disposable environment.
#[derive(Debug, Clone)]
pub struct SandboxSpec {
    /// Source text launched as the environment's entry command.
    pub code: String,
    /// Hard memory ceiling in MiB.
    pub mem_limit_mb: u64,
}

/// Opaque handle to one live environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxId(pub String);

/// Capability set of a sandbox backend.
///
/// Production backends talk to a container engine; test backends are
/// in-memory fakes returning scripted outcomes. The judge holds one
/// long-lived handle, injected at construction, and the handle is stateless
/// from the runner's perspective: every test case gets a fresh environment.
#[async_trait]
pub trait SandboxBackend: Send + Sync {
    /// Provision and start a fresh, network-isolated environment.
    ///
    /// On failure nothing may be left behind for the caller to clean up.
    async fn create(&self, spec: &SandboxSpec) -> Result<SandboxId, JudgeError>;

    /// Write `input` to the environment's stdin, then close the channel so
    /// the program sees end-of-input. Called exactly once per environment,
    /// with an empty `input` meaning close-only.
    async fn feed_stdin(&self, id: &SandboxId, input: &str) -> Result<(), JudgeError>;

    /// Block until the entry process terminates; yields its exit code.
    async fn wait(&self, id: &SandboxId) -> Result<i64, JudgeError>;

    async fn read_stdout(&self, id: &SandboxId) -> Result<String, JudgeError>;

    async fn read_stderr(&self, id: &SandboxId) -> Result<String, JudgeError>;

    /// Force-remove the environment, killing the process if still running.
    /// Must be safe to call on an already-dead environment.
    async fn remove(&self, id: &SandboxId) -> Result<(), JudgeError>;
}
