use chain_harness_config::constants::ACTIVE_PERMISSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Authorization entry naming the actor and permission a signature covers.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Authorization {
    pub actor: String,
    pub permission: String,
}

impl Authorization {
    /// Active-permission authorization for `actor`.
    #[must_use]
    pub fn active(actor: &str) -> Self {
        Self {
            actor: actor.to_owned(),
            permission: ACTIVE_PERMISSION.to_owned(),
        }
    }
}

/// One contract action inside a transaction.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Action {
    /// Contract account the action executes on.
    pub account: String,
    /// Action name within the contract.
    pub name: String,
    pub authorization: Vec<Authorization>,
    /// Action payload, passed through as raw JSON.
    pub data: Value,
}

impl Action {
    #[must_use]
    pub fn new(account: &str, name: &str, authorization: Vec<Authorization>, data: Value) -> Self {
        Self {
            account: account.to_owned(),
            name: name.to_owned(),
            authorization,
            data,
        }
    }
}

/// Unsigned transaction envelope. The expiration and reference block pin the
/// transaction to the head state observed at build time.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Transaction {
    pub expiration: DateTime<Utc>,
    pub ref_block_num: u64,
    pub actions: Vec<Action>,
}

/// Transaction plus the signatures covering it, ready to broadcast.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signatures: Vec<String>,
}

/// Submission knobs.
#[derive(Clone, Copy, Debug)]
pub struct SubmitOptions {
    /// Seconds past the observed head block time before the transaction
    /// expires.
    pub expire_secs: u64,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self { expire_secs: 30 }
    }
}
