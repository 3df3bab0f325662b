use std::{process::Output, time::Duration};

use anyhow::{Context as _, anyhow};
use tokio::{process::Command, time::timeout};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
#[error("{description} failed: {source}")]
pub struct DockerCommandError {
    description: &'static str,
    #[source]
    source: anyhow::Error,
}

impl DockerCommandError {
    fn new(description: &'static str, source: anyhow::Error) -> Self {
        Self {
            description,
            source,
        }
    }
}

/// Run a docker CLI invocation with a bounded timeout, failing on a non-zero
/// exit status.
pub(crate) async fn run_docker_command(
    mut command: Command,
    time_limit: Duration,
    description: &'static str,
) -> Result<Output, DockerCommandError> {
    debug!(description, "running docker command");

    let output = timeout(time_limit, command.output())
        .await
        .map_err(|_| {
            DockerCommandError::new(description, anyhow!("timed out after {time_limit:?}"))
        })?
        .with_context(|| format!("spawning {description}"))
        .map_err(|source| DockerCommandError::new(description, source))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DockerCommandError::new(
            description,
            anyhow!("exited with {}: {}", output.status, stderr.trim()),
        ));
    }

    Ok(output)
}
