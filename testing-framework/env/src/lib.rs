use std::env;

#[must_use]
pub fn slow_test_env() -> bool {
    env::var("SLOW_TEST_ENV").is_ok_and(|s| s == "true")
}

#[must_use]
pub fn harness_node_image() -> Option<String> {
    env::var("HARNESS_NODE_IMAGE").ok()
}

#[must_use]
pub fn harness_runner_host() -> Option<String> {
    env::var("HARNESS_RUNNER_HOST").ok()
}

#[must_use]
pub fn harness_wallet_url() -> Option<String> {
    env::var("HARNESS_WALLET_URL").ok()
}

#[must_use]
pub fn harness_keep_containers() -> bool {
    env::var("HARNESS_KEEP_CONTAINERS").is_ok()
}
