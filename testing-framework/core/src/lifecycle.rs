use std::time::Duration;

use async_trait::async_trait;

use crate::DynError;

/// Deployer-agnostic control surface for one node instance.
///
/// Implementations own process or container management; the session only ever
/// addresses an instance by the port it asked it to bind.
#[async_trait]
pub trait NodeLifecycle: Send + Sync {
    /// Launch a fresh node instance bound to `port`. Called once per session.
    async fn start(&self, port: u16) -> Result<(), DynError>;

    /// Terminate and clean up the instance bound to `port`.
    async fn stop(&self, port: u16) -> Result<(), DynError>;

    /// Reachable host for the instance's RPC endpoint.
    async fn resolve_address(&self, port: u16) -> Result<String, DynError>;

    /// Set the instance's internal clock to its baseline plus `offset`.
    ///
    /// The offset is absolute and cumulative, not an increment; callers pass
    /// the full virtual-time offset accumulated so far.
    async fn jump_time(&self, port: u16, offset: Duration) -> Result<(), DynError>;
}
