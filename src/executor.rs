use std::sync::Arc;
use std::time::Duration;

use crate::error::JudgeError;
use crate::sandbox::{SandboxBackend, SandboxId, SandboxSpec};

/// Runs one submission against one test case in a throwaway environment.
///
/// Configured once per problem with the problem's time and memory limits;
/// every `execute` call provisions a fresh environment and tears it down
/// before returning, on every path.
pub struct Executor {
    backend: Arc<dyn SandboxBackend>,
    timeout: Duration,
    mem_limit_mb: u64,
}

impl Executor {
    pub fn new(backend: Arc<dyn SandboxBackend>, timeout_secs: u64, mem_limit_mb: u64) -> Self {
        Self {
            backend,
            timeout: Duration::from_secs(timeout_secs),
            mem_limit_mb,
        }
    }

    /// Execute `code` with `stdin_text` fed to standard input.
    ///
    /// Returns the trimmed stdout on a clean exit. A non-zero exit yields a
    /// diagnostic string carrying the exit code and trimmed stderr; hitting
    /// the time limit yields an explicit "time limit exceeded" diagnostic.
    /// Only provisioning and mid-run backend faults surface as errors.
    pub async fn execute(&self, code: &str, stdin_text: &str) -> Result<String, JudgeError> {
        let spec = SandboxSpec {
            code: code.to_string(),
            mem_limit_mb: self.mem_limit_mb,
        };
        let id = self.backend.create(&spec).await?;

        let outcome = self.drive(&id, stdin_text).await;

        // Best-effort teardown; never masks the outcome already computed.
        if let Err(e) = self.backend.remove(&id).await {
            tracing::warn!(sandbox = %id.0, error = %e, "failed to remove sandbox environment");
        }

        outcome
    }

    async fn drive(&self, id: &SandboxId, stdin_text: &str) -> Result<String, JudgeError> {
        let input = if stdin_text.is_empty() {
            String::new()
        } else {
            format!("{stdin_text}\n")
        };
        self.backend.feed_stdin(id, &input).await?;

        let exit_code = match tokio::time::timeout(self.timeout, self.backend.wait(id)).await {
            Ok(waited) => waited?,
            Err(_) => {
                return Ok(format!(
                    "error: time limit exceeded after {}s",
                    self.timeout.as_secs()
                ))
            }
        };

        if exit_code != 0 {
            let stderr = self.backend.read_stderr(id).await?;
            return Ok(format!("error: exit code {exit_code}: {}", stderr.trim()));
        }

        let stdout = self.backend.read_stdout(id).await?;
        Ok(stdout.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::sandbox::fake::{ScriptedBackend, ScriptedRun};

    fn executor(backend: Arc<ScriptedBackend>) -> Executor {
        Executor::new(backend, 2, 64)
    }

    #[tokio::test]
    async fn clean_exit_returns_trimmed_stdout() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![ScriptedRun::ok("OK\n")]));
        let out = executor(backend.clone())
            .execute("print('OK')", "")
            .await
            .unwrap();

        assert_eq!(out, "OK");
        assert_eq!(backend.removed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn nonzero_exit_returns_diagnostic_not_stdout() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![ScriptedRun {
            exit_code: 1,
            stdout: "partial output".to_string(),
            stderr: "Runtime error\n".to_string(),
            ..Default::default()
        }]));
        let out = executor(backend.clone())
            .execute("raise SystemExit(1)", "")
            .await
            .unwrap();

        assert_eq!(out, "error: exit code 1: Runtime error");
        assert!(!out.contains("partial output"));
        assert_eq!(backend.removed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stdin_gets_trailing_newline_and_empty_stdin_only_closes() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![
            ScriptedRun::ok(""),
            ScriptedRun::ok(""),
        ]));
        let executor = executor(backend.clone());

        executor.execute("code", "1 2").await.unwrap();
        executor.execute("code", "").await.unwrap();

        let fed = backend.fed.lock().unwrap();
        assert_eq!(fed.as_slice(), ["1 2\n", ""]);
    }

    #[tokio::test(start_paused = true)]
    async fn time_limit_yields_explicit_diagnostic_and_teardown() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![ScriptedRun::hangs()]));
        let out = executor(backend.clone())
            .execute("while True: pass", "")
            .await
            .unwrap();

        assert_eq!(out, "error: time limit exceeded after 2s");
        assert_eq!(backend.removed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn midrun_fault_propagates_but_still_tears_down() {
        let backend = Arc::new(ScriptedBackend::with_script(vec![
            ScriptedRun::faults_on_wait(),
        ]));
        let err = executor(backend.clone())
            .execute("code", "")
            .await
            .unwrap_err();

        assert!(matches!(err, JudgeError::Backend(_)));
        assert_eq!(backend.removed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provisioning_failure_removes_nothing() {
        let backend = Arc::new(ScriptedBackend::unavailable());
        let err = executor(backend.clone())
            .execute("code", "")
            .await
            .unwrap_err();

        assert!(matches!(err, JudgeError::Provision(_)));
        assert_eq!(backend.removed.load(Ordering::SeqCst), 0);
    }
}
