use std::{env, time::Duration};

/// Attempts waiting for first block production after node start.
pub const PRODUCTION_WAIT_ATTEMPTS: u32 = 10;
pub const PRODUCTION_WAIT_INTERVAL_SECS: u64 = 1;

/// Attempts waiting for the system-contract readiness marker.
pub const SYSTEM_READY_ATTEMPTS: u32 = 15;
pub const SYSTEM_READY_INTERVAL_SECS: u64 = 2;

/// Attempts for block production to resume after a clock jump.
pub const JUMP_RETRY_ATTEMPTS: u32 = 10;

fn env_attempts(key: &str, default: u32) -> u32 {
    parse_attempts(env::var(key).ok(), default)
}

fn env_duration(key: &str, default: u64) -> Duration {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

fn parse_attempts(raw: Option<String>, default: u32) -> u32 {
    raw.and_then(|v| v.parse::<u32>().ok()).unwrap_or(default)
}

pub fn production_wait_attempts() -> u32 {
    env_attempts("HARNESS_PRODUCTION_WAIT_ATTEMPTS", PRODUCTION_WAIT_ATTEMPTS)
}

pub fn production_wait_interval() -> Duration {
    env_duration(
        "HARNESS_PRODUCTION_WAIT_INTERVAL_SECS",
        PRODUCTION_WAIT_INTERVAL_SECS,
    )
}

pub fn system_ready_attempts() -> u32 {
    env_attempts("HARNESS_SYSTEM_READY_ATTEMPTS", SYSTEM_READY_ATTEMPTS)
}

pub fn system_ready_interval() -> Duration {
    env_duration(
        "HARNESS_SYSTEM_READY_INTERVAL_SECS",
        SYSTEM_READY_INTERVAL_SECS,
    )
}

pub fn jump_retry_attempts() -> u32 {
    env_attempts("HARNESS_JUMP_RETRY_ATTEMPTS", JUMP_RETRY_ATTEMPTS)
}

#[cfg(test)]
mod tests {
    use super::parse_attempts;

    #[test]
    fn attempts_override_parses_numeric_values() {
        assert_eq!(parse_attempts(Some("25".into()), 10), 25);
    }

    #[test]
    fn attempts_override_falls_back_on_garbage() {
        assert_eq!(parse_attempts(Some("not-a-number".into()), 10), 10);
        assert_eq!(parse_attempts(None, 10), 10);
    }
}
