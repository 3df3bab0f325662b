use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::error;

use crate::nodes::{
    signer::{SignerError, TransactionSigner},
    transaction::{Action, SignedTransaction, SubmitOptions, Transaction},
};

pub const CHAIN_INFO: &str = "/v1/chain/get_info";
pub const CHAIN_TABLE_ROWS: &str = "/v1/chain/get_table_rows";
pub const CHAIN_PUSH_TRANSACTION: &str = "/v1/chain/push_transaction";

#[derive(Debug, thiserror::Error)]
pub enum RpcClientError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("node rejected transaction ({status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("transaction signing failed: {0}")]
    Signer(#[from] SignerError),
    #[error("invalid node endpoint '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
}

/// Subset of `get_info` the harness consumes.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChainInfo {
    pub chain_id: String,
    pub head_block_num: u64,
    pub head_block_time: DateTime<Utc>,
}

/// Raw rows of a contract table.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TableRows {
    #[serde(default)]
    pub rows: Vec<Value>,
}

/// Receipt for a committed transaction.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TransactionReceipt {
    pub transaction_id: String,
    #[serde(default)]
    pub processed: Value,
}

/// Thin typed client for one node's RPC surface.
///
/// Holds no local chain state; the signer is injected per session rather than
/// shared process-wide.
#[derive(Clone)]
pub struct RpcClient {
    base_url: Url,
    client: Client,
    signer: Arc<dyn TransactionSigner>,
}

impl RpcClient {
    /// Construct a client for the node reachable at `host:port`.
    pub fn new(
        host: &str,
        port: u16,
        signer: Arc<dyn TransactionSigner>,
    ) -> Result<Self, RpcClientError> {
        let endpoint = format!("http://{host}:{port}/");
        let base_url = Url::parse(&endpoint)
            .map_err(|source| RpcClientError::Endpoint { endpoint, source })?;
        Ok(Self::from_url(base_url, signer))
    }

    /// Construct from a prebuilt URL.
    #[must_use]
    pub fn from_url(base_url: Url, signer: Arc<dyn TransactionSigner>) -> Self {
        Self {
            base_url,
            client: Client::new(),
            signer,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Head block number and timestamp, plus the chain id.
    pub async fn get_info(&self) -> Result<ChainInfo, RpcClientError> {
        self.post_json(CHAIN_INFO, &json!({})).await
    }

    /// Rows of `table` under contract `code` within `scope`.
    pub async fn get_table_rows(
        &self,
        code: &str,
        table: &str,
        scope: &str,
    ) -> Result<TableRows, RpcClientError> {
        let body = json!({
            "json": true,
            "code": code,
            "table": table,
            "scope": scope,
        });
        self.post_json(CHAIN_TABLE_ROWS, &body).await
    }

    /// Build, sign and broadcast a transaction carrying `actions`.
    ///
    /// Failures surface verbatim; retry policy belongs to the caller.
    pub async fn submit_transaction(
        &self,
        actions: Vec<Action>,
        options: SubmitOptions,
    ) -> Result<TransactionReceipt, RpcClientError> {
        let info = self.get_info().await?;
        let transaction = Transaction {
            expiration: info.head_block_time
                + ChronoDuration::seconds(options.expire_secs as i64),
            ref_block_num: info.head_block_num,
            actions,
        };
        let signed = self.signer.sign(&info.chain_id, &transaction).await?;
        self.push_transaction(&signed).await
    }

    async fn push_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TransactionReceipt, RpcClientError> {
        let response = self
            .client
            .post(self.join(CHAIN_PUSH_TRANSACTION))
            .json(signed)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            error!(%status, %message, "push_transaction rejected");
            return Err(RpcClientError::Rejected { status, message });
        }

        Ok(response.json().await?)
    }

    async fn post_json<T, R>(&self, path: &str, body: &T) -> Result<R, RpcClientError>
    where
        T: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.client.post(self.join(path)).json(body).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    fn join(&self, path: &str) -> Url {
        let trimmed = path.trim_start_matches('/');
        match self.base_url.join(trimmed) {
            Ok(url) => url,
            Err(err) => {
                error!(
                    error = %err,
                    base = %self.base_url,
                    path,
                    "failed to join url; falling back to base url"
                );
                self.base_url.clone()
            }
        }
    }
}
