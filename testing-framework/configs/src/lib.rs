use std::{ops::Mul as _, sync::LazyLock, time::Duration};

use chain_harness_env as harness_env;

pub mod constants;
pub mod timeouts;

static IS_SLOW_TEST_ENV: LazyLock<bool> = LazyLock::new(harness_env::slow_test_env);

const SLOW_ENV_TIMEOUT_MULTIPLIER: u32 = 2;

/// In slow test environments like CI coverage runs, use 2x timeout.
#[must_use]
pub fn adjust_timeout(d: Duration) -> Duration {
    if *IS_SLOW_TEST_ENV {
        d.mul(SLOW_ENV_TIMEOUT_MULTIPLIER)
    } else {
        d
    }
}
