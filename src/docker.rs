use async_trait::async_trait;
use bollard::container::{
    AttachContainerOptions, AttachContainerResults, Config, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, WaitContainerOptions,
};
use bollard::models::HostConfig;
use bollard::Docker;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;

use crate::error::JudgeError;
use crate::sandbox::{SandboxBackend, SandboxId, SandboxSpec};

/// Pinned runtime image for submitted code.
pub const DEFAULT_IMAGE: &str = "python:3.9-slim";

/// Production sandbox backend speaking the Docker Engine API.
///
/// Each environment is a single-use container: pinned interpreter image,
/// memory ceiling, networking fully disabled, submitted code as the entry
/// command. The connection handle is long-lived and shared across calls.
pub struct DockerBackend {
    docker: Docker,
    image: String,
}

impl DockerBackend {
    /// Connect to the local Docker daemon.
    pub fn connect() -> Result<Self, JudgeError> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| JudgeError::Provision(format!("docker daemon unreachable: {e}")))?;
        Ok(Self {
            docker,
            image: DEFAULT_IMAGE.to_string(),
        })
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    async fn collect_logs(&self, id: &SandboxId, stdout: bool) -> Result<String, JudgeError> {
        let options = LogsOptions::<String> {
            stdout,
            stderr: !stdout,
            ..Default::default()
        };
        let mut stream = self.docker.logs(&id.0, Some(options));

        let mut collected = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| JudgeError::Backend(format!("read logs: {e}")))?;
            collected.push_str(&String::from_utf8_lossy(&chunk.into_bytes()));
        }
        Ok(collected)
    }
}

fn container_config(image: &str, spec: &SandboxSpec) -> Config<String> {
    Config {
        image: Some(image.to_string()),
        // -u disables interpreter output buffering so writes stay
        // observable even on abnormal termination.
        cmd: Some(vec![
            "python".to_string(),
            "-u".to_string(),
            "-c".to_string(),
            spec.code.clone(),
        ]),
        open_stdin: Some(true),
        // Close the container's stdin when the single attach client
        // detaches; without this a program reading to EOF blocks until
        // the time limit.
        stdin_once: Some(true),
        attach_stdin: Some(true),
        attach_stdout: Some(true),
        attach_stderr: Some(true),
        network_disabled: Some(true),
        host_config: Some(HostConfig {
            memory: Some((spec.mem_limit_mb * 1024 * 1024) as i64),
            network_mode: Some("none".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[async_trait]
impl SandboxBackend for DockerBackend {
    async fn create(&self, spec: &SandboxSpec) -> Result<SandboxId, JudgeError> {
        let config = container_config(&self.image, spec);

        let created = self
            .docker
            .create_container(None::<bollard::container::CreateContainerOptions<String>>, config)
            .await
            .map_err(|e| JudgeError::Provision(format!("create container: {e}")))?;

        if let Err(e) = self
            .docker
            .start_container(&created.id, None::<StartContainerOptions<String>>)
            .await
        {
            // The container exists but never ran; clean it up here so the
            // caller only ever owns environments that started.
            let _ = self
                .docker
                .remove_container(
                    &created.id,
                    Some(RemoveContainerOptions {
                        force: true,
                        ..Default::default()
                    }),
                )
                .await;
            return Err(JudgeError::Provision(format!("start container: {e}")));
        }

        Ok(SandboxId(created.id))
    }

    async fn feed_stdin(&self, id: &SandboxId, input: &str) -> Result<(), JudgeError> {
        let options = AttachContainerOptions::<String> {
            stdin: Some(true),
            stream: Some(true),
            ..Default::default()
        };
        let AttachContainerResults {
            input: mut sink, ..
        } = self
            .docker
            .attach_container(&id.0, Some(options))
            .await
            .map_err(|e| JudgeError::Backend(format!("attach stdin: {e}")))?;

        if !input.is_empty() {
            sink.write_all(input.as_bytes())
                .await
                .map_err(|e| JudgeError::Backend(format!("write stdin: {e}")))?;
        }
        // Closing the channel signals end-of-input to the program.
        sink.shutdown()
            .await
            .map_err(|e| JudgeError::Backend(format!("close stdin: {e}")))?;
        Ok(())
    }

    async fn wait(&self, id: &SandboxId) -> Result<i64, JudgeError> {
        let options = WaitContainerOptions {
            condition: "not-running",
        };
        let mut stream = self.docker.wait_container(&id.0, Some(options));

        match stream.next().await {
            Some(Ok(response)) => Ok(response.status_code),
            // bollard reports a non-zero exit as a wait error carrying the
            // status code; that is a normal outcome for the judge.
            Some(Err(bollard::errors::Error::DockerContainerWaitError { code, .. })) => Ok(code),
            Some(Err(e)) => Err(JudgeError::Backend(format!("wait: {e}"))),
            None => Err(JudgeError::Backend(
                "wait stream ended without a status".to_string(),
            )),
        }
    }

    async fn read_stdout(&self, id: &SandboxId) -> Result<String, JudgeError> {
        self.collect_logs(id, true).await
    }

    async fn read_stderr(&self, id: &SandboxId) -> Result<String, JudgeError> {
        self.collect_logs(id, false).await
    }

    async fn remove(&self, id: &SandboxId) -> Result<(), JudgeError> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };
        self.docker
            .remove_container(&id.0, Some(options))
            .await
            .map_err(|e| JudgeError::Backend(format!("remove container: {e}")))
    }
}
