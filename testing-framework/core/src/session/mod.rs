pub mod accounts;
pub mod monitor;
pub mod time_travel;

use std::{sync::Arc, time::Duration};

use chain_harness_config::{
    constants::{
        DEFAULT_ACCOUNT_COUNT, DEFAULT_FUNDING_AMOUNT, FIRST_NODE_PORT, LAST_NODE_PORT,
        SYSTEM_ACCOUNT, SYSTEM_READY_TABLE,
    },
    timeouts,
};
use chrono::{DateTime, Utc};
use rand::Rng as _;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    DynError,
    lifecycle::NodeLifecycle,
    nodes::{
        Action, RpcClient, RpcClientError, SubmitOptions, TransactionReceipt, TransactionSigner,
    },
};

use self::{
    accounts::{AccountProvisioner, ProvisionError, TestAccount, batch_names},
    monitor::{BlockMonitor, ElapsedBlocks},
    time_travel::{TimeTravel, TimeTravelError},
};

/// Session setup options. `system_setup` turns on the heavier readiness gate
/// for chains that boot a system contract before accounts can be created.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub system_setup: bool,
    pub account_count: usize,
    pub funding_amount: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_setup: false,
            account_count: DEFAULT_ACCOUNT_COUNT,
            funding_amount: DEFAULT_FUNDING_AMOUNT.to_owned(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to start node on port {port}: {source}")]
    Start { port: u16, source: DynError },
    #[error("failed to resolve node address on port {port}: {source}")]
    ResolveAddress { port: u16, source: DynError },
    #[error("node on port {port} never began producing blocks after {attempts} attempts")]
    ProductionTimeout { port: u16, attempts: u32 },
    #[error("system contract readiness never appeared after {attempts} attempts")]
    SystemReadinessTimeout { attempts: u32 },
    #[error(transparent)]
    Provisioning(#[from] ProvisionError),
    #[error(transparent)]
    Rpc(#[from] RpcClientError),
    #[error("failed to stop node on port {port}: {source}")]
    Stop { port: u16, source: DynError },
}

/// Façade owning one ephemeral node instance: startup readiness checks,
/// account provisioning, transaction submission, virtual-time control and
/// teardown.
///
/// Sessions are independent of one another (distinct ports, distinct node
/// instances); all operations within a session run sequentially.
pub struct ChainSession {
    port: u16,
    client: RpcClient,
    monitor: BlockMonitor,
    lifecycle: Arc<dyn NodeLifecycle>,
    time_travel: TimeTravel,
    accounts: Vec<TestAccount>,
}

impl ChainSession {
    /// Start a node, wait until it is usable, and provision the default test
    /// account batch. Any failure is fatal; no partial session is returned.
    ///
    /// A port collision inside the narrow range surfaces through the start
    /// error and is retryable by calling `setup` again.
    pub async fn setup(
        config: SessionConfig,
        lifecycle: Arc<dyn NodeLifecycle>,
        signer: Arc<dyn TransactionSigner>,
    ) -> Result<Self, SessionError> {
        let port = pick_port();
        info!(port, system_setup = config.system_setup, "starting chain session");

        lifecycle
            .start(port)
            .await
            .map_err(|source| SessionError::Start { port, source })?;

        let host = lifecycle
            .resolve_address(port)
            .await
            .map_err(|source| SessionError::ResolveAddress { port, source })?;
        let client = RpcClient::new(&host, port, Arc::clone(&signer))?;
        let monitor = BlockMonitor::new(client.clone());

        wait_for_production(&monitor, port).await?;
        if config.system_setup {
            wait_for_system_ready(&client).await?;
        }

        let names = batch_names(config.account_count);
        let provisioner = AccountProvisioner::new(client.clone());
        let accounts = provisioner
            .provision_accounts(&names, signer.public_key(), &config.funding_amount)
            .await?;

        let time_travel = TimeTravel::new(
            monitor.clone(),
            client.clone(),
            Arc::clone(&lifecycle),
            port,
        );

        info!(port, accounts = accounts.len(), "chain session ready");
        Ok(Self {
            port,
            client,
            monitor,
            lifecycle,
            time_travel,
            accounts,
        })
    }

    /// Stop and remove the owned node instance.
    ///
    /// Not idempotent: a second call on an already-removed instance may fail.
    /// Callers track session validity themselves.
    pub async fn teardown(&self) -> Result<(), SessionError> {
        info!(port = self.port, "tearing down chain session");
        self.lifecycle
            .stop(self.port)
            .await
            .map_err(|source| SessionError::Stop {
                port: self.port,
                source,
            })
    }

    /// Submit actions as one transaction. Failures surface verbatim, with no
    /// retry wrapping, so tests can assert on expected rejections.
    pub async fn submit(
        &self,
        actions: Vec<Action>,
        options: SubmitOptions,
    ) -> Result<TransactionReceipt, RpcClientError> {
        self.client.submit_transaction(actions, options).await
    }

    /// Single-action convenience over [`Self::submit`].
    pub async fn submit_action(&self, action: Action) -> Result<TransactionReceipt, RpcClientError> {
        self.submit(vec![action], SubmitOptions::default()).await
    }

    /// Advance virtual time by `delta_secs`; see [`TimeTravel::add_time`].
    pub async fn add_time(
        &mut self,
        delta_secs: i64,
        from_block_time: Option<DateTime<Utc>>,
    ) -> Result<i64, TimeTravelError> {
        self.time_travel.add_time(delta_secs, from_block_time).await
    }

    /// Current head block number.
    pub async fn head_block_num(&self) -> Result<u64, RpcClientError> {
        Ok(self.client.get_info().await?.head_block_num)
    }

    /// Wait for `count` more blocks past the current head.
    pub async fn wait_for_blocks(&self, count: u64) -> Result<ElapsedBlocks, RpcClientError> {
        self.monitor.wait_for_next_blocks(count).await
    }

    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn accounts(&self) -> &[TestAccount] {
        &self.accounts
    }

    /// Cumulative virtual time added to this session so far.
    #[must_use]
    pub const fn cumulative_offset(&self) -> Duration {
        self.time_travel.cumulative_offset()
    }

    #[must_use]
    pub const fn client(&self) -> &RpcClient {
        &self.client
    }
}

fn pick_port() -> u16 {
    rand::thread_rng().gen_range(FIRST_NODE_PORT..=LAST_NODE_PORT)
}

async fn wait_for_production(monitor: &BlockMonitor, port: u16) -> Result<(), SessionError> {
    let attempts = timeouts::production_wait_attempts();
    let interval = timeouts::production_wait_interval();
    for attempt in 1..=attempts {
        if monitor.is_producing_block().await {
            debug!(attempt, "block production detected");
            return Ok(());
        }
        warn!(attempt, attempts, "node not producing yet");
        sleep(interval).await;
    }
    Err(SessionError::ProductionTimeout { port, attempts })
}

async fn wait_for_system_ready(client: &RpcClient) -> Result<(), SessionError> {
    let attempts = timeouts::system_ready_attempts();
    let interval = timeouts::system_ready_interval();
    for attempt in 1..=attempts {
        match client
            .get_table_rows(SYSTEM_ACCOUNT, SYSTEM_READY_TABLE, SYSTEM_ACCOUNT)
            .await
        {
            Ok(rows) if !rows.rows.is_empty() => {
                debug!(attempt, "system contract state visible");
                // Give the system contract one more interval to finish its own
                // bootstrap before the first privileged transaction hits it.
                sleep(interval).await;
                return Ok(());
            }
            Ok(_) => debug!(attempt, "system table still empty"),
            Err(err) => debug!(attempt, error = %err, "system readiness probe failed"),
        }
        sleep(interval).await;
    }
    Err(SessionError::SystemReadinessTimeout { attempts })
}
