use std::time::Duration;

/// First port of the range session nodes bind to.
pub const FIRST_NODE_PORT: u16 = 8900;

/// Last port of the range (inclusive). The range is kept narrow so a
/// collision surfaces as a retryable startup failure instead of two sessions
/// silently sharing an instance.
pub const LAST_NODE_PORT: u16 = 8999;

/// RPC port the node binary listens on inside its container.
pub const CONTAINER_RPC_PORT: u16 = 8888;

/// Nominal block interval of the chain under test.
///
/// The time-jump compensation assumes this cadence; revisit it if the node's
/// production interval ever changes.
pub const NOMINAL_BLOCK_INTERVAL: Duration = Duration::from_millis(500);

/// Gap between the two head samples of a production probe.
pub const PRODUCTION_PROBE_INTERVAL: Duration = Duration::from_millis(600);

/// Poll interval for block-height waits.
pub const BLOCK_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Sleep between a clock jump and the production re-check.
pub const JUMP_SETTLE_INTERVAL: Duration = Duration::from_secs(1);

/// Blocks waited before and after a clock jump so in-flight transactions
/// finalize around the sensitive window.
pub const SETTLE_BLOCKS: u64 = 2;

/// Privileged funding identity used to create and authorize test accounts.
pub const SYSTEM_ACCOUNT: &str = "system";

/// Contract account holding the native token.
pub const TOKEN_ACCOUNT: &str = "token";

/// Permission the funding identity authorizes actions with.
pub const ACTIVE_PERMISSION: &str = "active";

/// Shared development key every test account is authorized with. The signing
/// collaborator must hold the matching private key.
pub const SHARED_TEST_PUBKEY: &str = "PUB_TST_7zNkN1vGK9qYhwhpWvRmQJqvTcBdKxmJ3sE5cDiLuWcGdqQeD9";

/// Namespace suffix appended to every provisioned account name.
pub const ACCOUNT_NAME_SUFFIX: &str = ".test";

/// Number of accounts a fresh session provisions by default.
pub const DEFAULT_ACCOUNT_COUNT: usize = 10;

/// Native-token quantity transferred to each test account by default.
pub const DEFAULT_FUNDING_AMOUNT: &str = "100.0000 TEST";

/// Network bandwidth stake delegated to each test account.
pub const DEFAULT_NET_STAKE: &str = "10.0000 TEST";

/// CPU bandwidth stake delegated to each test account.
pub const DEFAULT_CPU_STAKE: &str = "10.0000 TEST";

/// Storage bytes purchased for each test account.
pub const DEFAULT_STORAGE_BYTES: u64 = 65_536;

/// Memo attached to the funding transfer.
pub const FUNDING_MEMO: &str = "test account funding";

/// Table under the system contract that only exists once system setup has
/// completed; used as the heavier readiness marker.
pub const SYSTEM_READY_TABLE: &str = "global";
