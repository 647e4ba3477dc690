//! Constants shared across the application.

/// Default location of the application configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/app.json";

/// Fire once per minute, at second zero
pub const DEFAULT_CRON_SCHEDULE: &str = "0 * * * * *";

pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io";
pub const DEFAULT_ESPLORA_API_URL: &str = "https://blockstream.info/api";
pub const DEFAULT_ETHERSCAN_EXPLORER_URL: &str = "https://etherscan.io";
pub const DEFAULT_ESPLORA_EXPLORER_URL: &str = "https://blockstream.info";

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Minimum time between two admitted cycles
pub const DEFAULT_MIN_POLL_INTERVAL_MS: i64 = 60_000;

/// Length of the cool-down window entered after a provider rate-limit signal
pub const DEFAULT_RATE_LIMIT_DELAY_MS: i64 = 60_000;

/// Consecutive failures at which the too-many-errors alert fires
pub const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 3;

/// Number of transactions kept per chain
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// How long a freshly delivered transaction keeps its `isNew` highlight
pub const DEFAULT_NEW_FLAG_TTL_MS: u64 = 4_000;

/// Slack allowed between timer period and throttle window
pub const THROTTLE_DRIFT_TOLERANCE_MS: i64 = 1_000;

pub const DEFAULT_STATUS_SERVER_ADDRESS: &str = "127.0.0.1:8081";

/// Capacity of the in-process event and store-change channels
pub const EVENT_CHANNEL_CAPACITY: usize = 64;
