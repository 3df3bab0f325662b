use async_trait::async_trait;
use chain_harness_config::constants::SHARED_TEST_PUBKEY;
use chain_harness_env as harness_env;
use reqwest::{Client, Url};
use serde_json::json;
use tracing::debug;

use crate::nodes::transaction::{SignedTransaction, Transaction};

/// Path the wallet daemon signs transactions on.
pub const WALLET_SIGN_TRANSACTION: &str = "/v1/wallet/sign_transaction";

/// Default local wallet daemon endpoint, just below the node port range.
pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:8899";

#[derive(Debug, thiserror::Error)]
pub enum SignerError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("wallet rejected signing request ({status}): {message}")]
    Rejected {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("invalid wallet endpoint '{endpoint}': {source}")]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
    },
}

/// Signs transaction envelopes on behalf of the shared test key.
///
/// Injected into the RPC client per session; implementations decide where the
/// key material lives.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    /// Public key test accounts are authorized with.
    fn public_key(&self) -> &str;

    /// Sign `transaction` for `chain_id` and return the broadcastable
    /// envelope.
    async fn sign(
        &self,
        chain_id: &str,
        transaction: &Transaction,
    ) -> Result<SignedTransaction, SignerError>;
}

/// Signer backed by an external wallet daemon holding the development key.
pub struct HttpWalletSigner {
    wallet_url: Url,
    public_key: String,
    client: Client,
}

impl HttpWalletSigner {
    pub fn new(wallet_url: &str, public_key: &str) -> Result<Self, SignerError> {
        let parsed = Url::parse(wallet_url).map_err(|source| SignerError::Endpoint {
            endpoint: wallet_url.to_owned(),
            source,
        })?;
        Ok(Self {
            wallet_url: parsed,
            public_key: public_key.to_owned(),
            client: Client::new(),
        })
    }

    /// Wallet endpoint from `HARNESS_WALLET_URL`, falling back to the local
    /// default, signing with the shared test key.
    pub fn from_env() -> Result<Self, SignerError> {
        let url = harness_env::harness_wallet_url().unwrap_or_else(|| DEFAULT_WALLET_URL.to_owned());
        Self::new(&url, SHARED_TEST_PUBKEY)
    }

    fn sign_url(&self) -> Url {
        let trimmed = WALLET_SIGN_TRANSACTION.trim_start_matches('/');
        self.wallet_url
            .join(trimmed)
            .unwrap_or_else(|_| self.wallet_url.clone())
    }
}

#[async_trait]
impl TransactionSigner for HttpWalletSigner {
    fn public_key(&self) -> &str {
        &self.public_key
    }

    async fn sign(
        &self,
        chain_id: &str,
        transaction: &Transaction,
    ) -> Result<SignedTransaction, SignerError> {
        debug!(
            wallet = %self.wallet_url,
            actions = transaction.actions.len(),
            "requesting wallet signature"
        );
        let body = json!([transaction, [&self.public_key], chain_id]);
        let response = self.client.post(self.sign_url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_owned());
            return Err(SignerError::Rejected { status, message });
        }

        Ok(response.json().await?)
    }
}
