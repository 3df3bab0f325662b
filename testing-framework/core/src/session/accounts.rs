use chain_harness_config::constants::{
    ACCOUNT_NAME_SUFFIX, DEFAULT_CPU_STAKE, DEFAULT_NET_STAKE, DEFAULT_STORAGE_BYTES,
    FUNDING_MEMO, SYSTEM_ACCOUNT, TOKEN_ACCOUNT,
};
use serde_json::json;
use tracing::info;

use crate::nodes::{Action, Authorization, RpcClient, RpcClientError, SubmitOptions};

/// A funded, authorized identity on the chain under test.
///
/// Only valid within the session that created it; destroyed implicitly when
/// the owning node instance is torn down.
#[derive(Clone, Debug)]
pub struct TestAccount {
    pub name: String,
    pub public_key: String,
    pub funded: String,
    pub net_stake: String,
    pub cpu_stake: String,
    pub storage_bytes: u64,
}

/// Deterministic name for the account at `index`: group and slot digits
/// derived from the index (five slots per group, both 1-based) plus the test
/// namespace suffix. Index 0 maps to `a11.test`, index 9 to `a25.test`.
#[must_use]
pub fn account_name(index: usize) -> String {
    let group = 1 + index / 5;
    let slot = 1 + index % 5;
    format!("a{group}{slot}{ACCOUNT_NAME_SUFFIX}")
}

/// Names for a batch of `count` accounts, stable across runs.
#[must_use]
pub fn batch_names(count: usize) -> Vec<String> {
    (0..count).map(account_name).collect()
}

#[derive(Debug, thiserror::Error)]
#[error("failed to provision account '{name}': {source}")]
pub struct ProvisionError {
    name: String,
    #[source]
    source: RpcClientError,
}

impl ProvisionError {
    /// Name of the account whose creation failed.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.name
    }
}

/// Creates and funds test accounts through the privileged funding identity.
pub struct AccountProvisioner {
    client: RpcClient,
}

impl AccountProvisioner {
    #[must_use]
    pub const fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// Create each named account in sequence. Creation is one atomic
    /// transaction of four actions; the first failure aborts the remaining
    /// batch with no partial-account cleanup.
    ///
    /// Sequential on purpose: every action authorizes as the funding
    /// identity, whose authorization sequence must increase strictly.
    pub async fn provision_accounts(
        &self,
        names: &[String],
        public_key: &str,
        funding: &str,
    ) -> Result<Vec<TestAccount>, ProvisionError> {
        let mut accounts = Vec::with_capacity(names.len());
        for name in names {
            self.create_account(name, public_key, funding)
                .await
                .map_err(|source| ProvisionError {
                    name: name.clone(),
                    source,
                })?;
            accounts.push(TestAccount {
                name: name.clone(),
                public_key: public_key.to_owned(),
                funded: funding.to_owned(),
                net_stake: DEFAULT_NET_STAKE.to_owned(),
                cpu_stake: DEFAULT_CPU_STAKE.to_owned(),
                storage_bytes: DEFAULT_STORAGE_BYTES,
            });
            info!(account = %name, "test account provisioned");
        }
        Ok(accounts)
    }

    async fn create_account(
        &self,
        name: &str,
        public_key: &str,
        funding: &str,
    ) -> Result<(), RpcClientError> {
        let actions = creation_actions(name, public_key, funding);
        self.client
            .submit_transaction(actions, SubmitOptions::default())
            .await?;
        Ok(())
    }
}

/// The four chained actions creating one account, in their required order:
/// create the identity, buy its storage, delegate bandwidth stake, fund it.
/// All four commit atomically or the account does not exist.
#[must_use]
pub fn creation_actions(name: &str, public_key: &str, funding: &str) -> Vec<Action> {
    let authority = json!({
        "threshold": 1,
        "keys": [{ "key": public_key, "weight": 1 }],
    });
    let system_auth = vec![Authorization::active(SYSTEM_ACCOUNT)];

    vec![
        Action::new(
            SYSTEM_ACCOUNT,
            "newaccount",
            system_auth.clone(),
            json!({
                "creator": SYSTEM_ACCOUNT,
                "name": name,
                "owner": authority.clone(),
                "active": authority,
            }),
        ),
        Action::new(
            SYSTEM_ACCOUNT,
            "buybytes",
            system_auth.clone(),
            json!({
                "payer": SYSTEM_ACCOUNT,
                "receiver": name,
                "bytes": DEFAULT_STORAGE_BYTES,
            }),
        ),
        Action::new(
            SYSTEM_ACCOUNT,
            "delegate",
            system_auth.clone(),
            json!({
                "from": SYSTEM_ACCOUNT,
                "receiver": name,
                "net_quantity": DEFAULT_NET_STAKE,
                "cpu_quantity": DEFAULT_CPU_STAKE,
                "transfer": true,
            }),
        ),
        Action::new(
            TOKEN_ACCOUNT,
            "transfer",
            system_auth,
            json!({
                "from": SYSTEM_ACCOUNT,
                "to": name,
                "quantity": funding,
                "memo": FUNDING_MEMO,
            }),
        ),
    ]
}
