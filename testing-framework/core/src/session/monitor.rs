use std::time::Duration;

use chain_harness_config::constants::{BLOCK_POLL_INTERVAL, PRODUCTION_PROBE_INTERVAL};
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::nodes::{ChainInfo, RpcClient, RpcClientError};

/// Outcome of a settling wait: the head snapshot taken before waiting and
/// the number of blocks that actually went by.
#[derive(Clone, Debug)]
pub struct ElapsedBlocks {
    pub start_info: ChainInfo,
    pub blocks_elapsed: u64,
}

/// Error raised when a deadline-bounded block-height wait expires.
#[derive(Clone, Copy, Debug, thiserror::Error)]
#[error("timeout waiting for block height {target} after {deadline:?}")]
pub struct BlockHeightTimeout {
    target: u64,
    deadline: Duration,
}

impl BlockHeightTimeout {
    #[must_use]
    pub const fn target(&self) -> u64 {
        self.target
    }

    #[must_use]
    pub const fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Polling probes over one node's head state.
///
/// The chain pushes no block notifications, so every synchronization point
/// is a coarse polling loop against `get_info`.
#[derive(Clone)]
pub struct BlockMonitor {
    client: RpcClient,
}

impl BlockMonitor {
    #[must_use]
    pub const fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// Liveness probe: true iff the head advanced between two samples taken
    /// `PRODUCTION_PROBE_INTERVAL` apart. RPC failures read as "not
    /// producing", never as errors.
    pub async fn is_producing_block(&self) -> bool {
        let Ok(before) = self.client.get_info().await else {
            return false;
        };
        sleep(PRODUCTION_PROBE_INTERVAL).await;
        let Ok(after) = self.client.get_info().await else {
            return false;
        };
        debug!(
            before = before.head_block_num,
            after = after.head_block_num,
            "production probe"
        );
        after.head_block_num > before.head_block_num
    }

    /// Poll until the head reaches `target`, returning the height finally
    /// observed. Unbounded; callers bring their own deadline. Transient RPC
    /// failures count as "not yet" observations.
    pub async fn wait_until_block_height(&self, target: u64) -> u64 {
        loop {
            match self.client.get_info().await {
                Ok(info) if info.head_block_num >= target => return info.head_block_num,
                Ok(_) => {}
                Err(err) => debug!(error = %err, target, "head poll failed; retrying"),
            }
            sleep(BLOCK_POLL_INTERVAL).await;
        }
    }

    /// Deadline-bounded variant of [`Self::wait_until_block_height`].
    pub async fn wait_until_block_height_with_deadline(
        &self,
        target: u64,
        deadline: Duration,
    ) -> Result<u64, BlockHeightTimeout> {
        timeout(deadline, self.wait_until_block_height(target))
            .await
            .map_err(|_| BlockHeightTimeout { target, deadline })
    }

    /// Settling barrier: wait for `count` more blocks past the current head.
    /// Returns the starting snapshot plus the number of blocks that actually
    /// elapsed, which polling granularity can push past `count`.
    pub async fn wait_for_next_blocks(&self, count: u64) -> Result<ElapsedBlocks, RpcClientError> {
        let start_info = self.client.get_info().await?;
        let target = start_info.head_block_num + count;
        let reached = self.wait_until_block_height(target).await;
        let blocks_elapsed = reached - start_info.head_block_num;
        debug!(
            from = start_info.head_block_num,
            reached, blocks_elapsed, "settling wait finished"
        );
        Ok(ElapsedBlocks {
            start_info,
            blocks_elapsed,
        })
    }
}
