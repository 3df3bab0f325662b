//! End-to-end session scenarios. These need docker, a chain node image and a
//! wallet daemon holding the shared test key, so they are ignored by default:
//!
//! `cargo test -p tests-integration -- --ignored`

use std::{sync::Arc, time::Duration};

use chain_harness_config::constants::{NOMINAL_BLOCK_INTERVAL, SETTLE_BLOCKS, TOKEN_ACCOUNT};
use chain_harness_core::{
    nodes::HttpWalletSigner,
    session::{ChainSession, SessionConfig, accounts::batch_names},
};
use chain_harness_runner_docker::DockerNodeRunner;
use serial_test::serial;

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

async fn start_session(
    config: SessionConfig,
) -> Result<ChainSession, Box<dyn std::error::Error + Send + Sync>> {
    let _ = tracing_subscriber::fmt::try_init();
    let lifecycle = Arc::new(DockerNodeRunner::from_env());
    let signer = Arc::new(HttpWalletSigner::from_env()?);
    Ok(ChainSession::setup(config, lifecycle, signer).await?)
}

#[tokio::test]
#[serial]
#[ignore = "requires docker, a chain node image and a wallet daemon"]
async fn add_time_advances_the_virtual_clock() -> TestResult {
    let mut session = start_session(SessionConfig::default()).await?;

    let elapsed_ms = session.add_time(10, None).await?;
    assert!(
        elapsed_ms >= 10_000,
        "expected at least 10s of chain time, got {elapsed_ms}ms"
    );

    // Settling compensation shaves up to a few block intervals off the
    // applied offset, so allow for the barriers on both sides of the jump.
    let settle_allowance = NOMINAL_BLOCK_INTERVAL * (2 * SETTLE_BLOCKS as u32 + 2);
    assert!(session.cumulative_offset() > Duration::ZERO);
    assert!(session.cumulative_offset() + settle_allowance >= Duration::from_secs(10));

    session.teardown().await?;
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires docker, a chain node image and a wallet daemon"]
async fn provisions_the_default_funded_account_batch() -> TestResult {
    let session = start_session(SessionConfig {
        system_setup: true,
        ..SessionConfig::default()
    })
    .await?;

    let names = session
        .accounts()
        .iter()
        .map(|account| account.name.clone())
        .collect::<Vec<_>>();
    assert_eq!(names, batch_names(10));

    for account in session.accounts() {
        let rows = session
            .client()
            .get_table_rows(TOKEN_ACCOUNT, "accounts", &account.name)
            .await?;
        let balance = rows
            .rows
            .first()
            .and_then(|row| row["balance"].as_str())
            .unwrap_or_default();
        assert_eq!(
            balance, account.funded,
            "account {} should hold its funding",
            account.name
        );
    }

    session.teardown().await?;
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires docker, a chain node image and a wallet daemon"]
async fn block_waits_never_return_early() -> TestResult {
    let session = start_session(SessionConfig::default()).await?;

    let before = session.head_block_num().await?;
    let elapsed = session.wait_for_blocks(3).await?;
    assert!(elapsed.blocks_elapsed >= 3);

    let after = session.head_block_num().await?;
    assert!(after >= before + 3);

    session.teardown().await?;
    Ok(())
}
