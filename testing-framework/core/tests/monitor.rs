use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chain_harness_core::{
    nodes::{RpcClient, SignedTransaction, SignerError, Transaction, TransactionSigner},
    session::monitor::BlockMonitor,
};

struct StubSigner;

#[async_trait]
impl TransactionSigner for StubSigner {
    fn public_key(&self) -> &str {
        "PUB_TST_stub"
    }

    async fn sign(
        &self,
        _chain_id: &str,
        transaction: &Transaction,
    ) -> Result<SignedTransaction, SignerError> {
        Ok(SignedTransaction {
            transaction: transaction.clone(),
            signatures: Vec::new(),
        })
    }
}

fn unreachable_monitor() -> BlockMonitor {
    // Port 9 (discard) refuses connections; every probe fails at the RPC
    // layer.
    let client = RpcClient::new("127.0.0.1", 9, Arc::new(StubSigner)).expect("valid endpoint");
    BlockMonitor::new(client)
}

#[tokio::test]
async fn production_probe_reads_rpc_failure_as_not_producing() {
    let monitor = unreachable_monitor();

    assert!(!monitor.is_producing_block().await);
}

#[tokio::test]
async fn bounded_height_wait_times_out_against_a_dead_node() {
    let monitor = unreachable_monitor();

    let result = monitor
        .wait_until_block_height_with_deadline(1, Duration::from_millis(300))
        .await;

    let err = result.expect_err("dead node cannot reach any height");
    assert_eq!(err.target(), 1);
    assert_eq!(err.deadline(), Duration::from_millis(300));
}
