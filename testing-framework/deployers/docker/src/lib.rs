mod commands;

use std::time::Duration;

use async_trait::async_trait;
use chain_harness_config::{adjust_timeout, constants::CONTAINER_RPC_PORT};
use chain_harness_core::{DynError, lifecycle::NodeLifecycle};
use chain_harness_env as harness_env;
use tokio::process::Command;
use tracing::{debug, info};

pub use commands::DockerCommandError;
use commands::run_docker_command;

const DOCKER_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Image the node container is created from when `HARNESS_NODE_IMAGE` is
/// unset.
pub const DEFAULT_NODE_IMAGE: &str = "chain-node:latest";

const CONTAINER_PREFIX: &str = "chain-harness-node";
const DEFAULT_RUNNER_HOST: &str = "127.0.0.1";

/// Docker-backed node lifecycle: one container per session port, addressed by
/// a deterministic container name.
pub struct DockerNodeRunner {
    image: String,
}

impl DockerNodeRunner {
    /// Runner for the image from `HARNESS_NODE_IMAGE`, falling back to the
    /// default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_image(
            harness_env::harness_node_image().unwrap_or_else(|| DEFAULT_NODE_IMAGE.to_owned()),
        )
    }

    #[must_use]
    pub const fn with_image(image: String) -> Self {
        Self { image }
    }

    #[must_use]
    pub fn container_name(port: u16) -> String {
        format!("{CONTAINER_PREFIX}-{port}")
    }
}

#[async_trait]
impl NodeLifecycle for DockerNodeRunner {
    async fn start(&self, port: u16) -> Result<(), DynError> {
        let name = Self::container_name(port);
        info!(port, image = %self.image, container = %name, "starting node container");

        let mut command = Command::new("docker");
        command
            .arg("run")
            .arg("--detach")
            .arg("--name")
            .arg(&name)
            .arg("--publish")
            .arg(format!("{port}:{CONTAINER_RPC_PORT}"))
            .arg(&self.image);
        run_docker_command(command, adjust_timeout(DOCKER_COMMAND_TIMEOUT), "docker run").await?;
        Ok(())
    }

    async fn stop(&self, port: u16) -> Result<(), DynError> {
        let name = Self::container_name(port);
        if harness_env::harness_keep_containers() {
            info!(container = %name, "keep-containers flag set; leaving container running");
            return Ok(());
        }
        info!(container = %name, "removing node container");

        let mut command = Command::new("docker");
        command.arg("rm").arg("--force").arg(&name);
        run_docker_command(command, adjust_timeout(DOCKER_COMMAND_TIMEOUT), "docker rm").await?;
        Ok(())
    }

    async fn resolve_address(&self, port: u16) -> Result<String, DynError> {
        let host = runner_host();
        debug!(port, host, "resolved node address");
        Ok(host)
    }

    async fn jump_time(&self, port: u16, offset: Duration) -> Result<(), DynError> {
        let name = Self::container_name(port);
        debug!(
            container = %name,
            offset_ms = offset.as_millis() as u64,
            "jumping node clock"
        );

        let mut command = Command::new("docker");
        command
            .arg("exec")
            .arg(&name)
            .arg("chain-node-ctl")
            .arg("set-clock-offset")
            .arg("--millis")
            .arg(offset.as_millis().to_string());
        run_docker_command(
            command,
            adjust_timeout(DOCKER_COMMAND_TIMEOUT),
            "docker exec set-clock-offset",
        )
        .await?;
        Ok(())
    }
}

fn runner_host() -> String {
    harness_env::harness_runner_host().unwrap_or_else(|| DEFAULT_RUNNER_HOST.to_owned())
}

#[cfg(test)]
mod tests {
    use super::DockerNodeRunner;

    #[test]
    fn container_names_are_port_scoped() {
        assert_eq!(
            DockerNodeRunner::container_name(8931),
            "chain-harness-node-8931"
        );
        assert_ne!(
            DockerNodeRunner::container_name(8931),
            DockerNodeRunner::container_name(8932)
        );
    }
}
