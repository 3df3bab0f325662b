pub mod rpc_client;
pub mod signer;
pub mod transaction;

pub use rpc_client::{ChainInfo, RpcClient, RpcClientError, TableRows, TransactionReceipt};
pub use signer::{HttpWalletSigner, SignerError, TransactionSigner};
pub use transaction::{Action, Authorization, SignedTransaction, SubmitOptions, Transaction};
