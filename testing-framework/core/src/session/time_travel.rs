use std::{sync::Arc, time::Duration};

use chain_harness_config::{
    constants::{JUMP_SETTLE_INTERVAL, NOMINAL_BLOCK_INTERVAL, SETTLE_BLOCKS},
    timeouts,
};
use chrono::{DateTime, Utc};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    DynError,
    lifecycle::NodeLifecycle,
    nodes::{RpcClient, RpcClientError},
    session::monitor::BlockMonitor,
};

#[derive(Debug, thiserror::Error)]
pub enum TimeTravelError {
    #[error("time can only move forward; got a delta of {delta_secs}s")]
    NegativeDelta { delta_secs: i64 },
    #[error("block production did not resume within {attempts} attempts after the clock jump")]
    StalledAfterJump { attempts: u32 },
    #[error(transparent)]
    Rpc(#[from] RpcClientError),
    #[error("clock-jump primitive failed: {source}")]
    Jump { source: DynError },
}

/// Advances a node's virtual clock while keeping block production alive.
///
/// The underlying primitive can only jump the clock to an absolute offset,
/// and jumping at the wrong moment stalls production, so every advance is
/// bracketed by settling waits and verified with a bounded retry loop.
pub struct TimeTravel {
    monitor: BlockMonitor,
    client: RpcClient,
    lifecycle: Arc<dyn NodeLifecycle>,
    port: u16,
    elapsed: Duration,
}

impl TimeTravel {
    /// Constructed by the session; public for custom wiring and tests.
    #[must_use]
    pub const fn new(
        monitor: BlockMonitor,
        client: RpcClient,
        lifecycle: Arc<dyn NodeLifecycle>,
        port: u16,
    ) -> Self {
        Self {
            monitor,
            client,
            lifecycle,
            port,
            elapsed: Duration::ZERO,
        }
    }

    /// Cumulative virtual time added so far. Never decreases.
    #[must_use]
    pub const fn cumulative_offset(&self) -> Duration {
        self.elapsed
    }

    /// Add `delta_secs` of virtual time on top of the chain's natural
    /// progression.
    ///
    /// Returns the approximate milliseconds between the reference time (the
    /// override when given, otherwise the settling start) and the head block
    /// time observed afterwards. Approximate on purpose: polling granularity
    /// and block-interval variance make sub-second precision unreliable, and
    /// the value can run a few seconds past the request.
    pub async fn add_time(
        &mut self,
        delta_secs: i64,
        from_block_time: Option<DateTime<Utc>>,
    ) -> Result<i64, TimeTravelError> {
        if delta_secs < 0 {
            return Err(TimeTravelError::NegativeDelta { delta_secs });
        }

        // Let in-flight transactions land before touching the clock. Time
        // passing during this wait already counts toward the requested delta.
        let settled = self.monitor.wait_for_next_blocks(SETTLE_BLOCKS).await?;
        let settle_start = settled.start_info.head_block_time;
        let reference = from_block_time.unwrap_or(settle_start);

        let offset = jump_offset(delta_secs, settled.blocks_elapsed, settle_start, reference);
        if offset.is_zero() {
            info!(delta_secs, "requested delta already covered by settling; skipping jump");
            return Ok(0);
        }

        let target = self.elapsed + offset;
        self.jump_until_producing(target).await?;
        self.elapsed = target;

        self.monitor.wait_for_next_blocks(SETTLE_BLOCKS).await?;

        let head_time = self.client.get_info().await?.head_block_time;
        let elapsed_ms = (head_time - reference).num_milliseconds();
        info!(
            delta_secs,
            offset_ms = offset.as_millis() as u64,
            total_offset_ms = self.elapsed.as_millis() as u64,
            elapsed_ms,
            "virtual time advanced"
        );
        Ok(elapsed_ms)
    }

    async fn jump_until_producing(&self, target: Duration) -> Result<(), TimeTravelError> {
        let attempts = timeouts::jump_retry_attempts();
        for attempt in 1..=attempts {
            self.lifecycle
                .jump_time(self.port, target)
                .await
                .map_err(|source| TimeTravelError::Jump { source })?;
            sleep(JUMP_SETTLE_INTERVAL).await;
            if self.monitor.is_producing_block().await {
                return Ok(());
            }
            warn!(attempt, attempts, "production has not resumed after clock jump");
        }
        Err(TimeTravelError::StalledAfterJump { attempts })
    }
}

/// Offset actually applied for a requested delta.
///
/// Time that passed "for free" while settling (elapsed blocks at the nominal
/// interval) and the gap back to an earlier reference point are both already
/// covered, so only the remainder is jumped. Clamped at zero. The nominal
/// block interval baked into the compensation must track the chain's real
/// cadence.
#[must_use]
pub fn jump_offset(
    delta_secs: i64,
    blocks_elapsed: u64,
    settle_start: DateTime<Utc>,
    reference: DateTime<Utc>,
) -> Duration {
    let requested_ms = delta_secs.saturating_mul(1000);
    let free_ms = (blocks_elapsed as i64).saturating_mul(NOMINAL_BLOCK_INTERVAL.as_millis() as i64);
    let reference_gap_ms = (settle_start - reference).num_milliseconds();
    let offset_ms = requested_ms - free_ms - reference_gap_ms;
    if offset_ms <= 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(offset_ms as u64)
    }
}
