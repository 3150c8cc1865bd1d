//! Application-wide constants and configuration defaults
//!
//! This module centralizes magic numbers so that config defaults, the
//! scheduler and the aggregators agree on the same values.

/// Default client-side deadline for every upstream request in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Header carrying the upstream credential on every request
pub const CREDENTIAL_HEADER: &str = "X-Riot-Token";

/// Number of trailing credential characters that may appear in logs
pub const CREDENTIAL_FRAGMENT_LEN: usize = 6;

/// Default host template; `{host}` is replaced by a platform or cluster code
pub const DEFAULT_HOST_TEMPLATE: &str = "https://{host}.api.riotgames.com";

/// Placeholder substituted in the host template
pub const HOST_PLACEHOLDER: &str = "{host}";

/// Ephemeral match cache settings
pub mod cache {
    /// TTL for finished match details (5 minutes)
    pub const MATCH_DETAIL_TTL_SECONDS: u64 = 300;

    /// Maximum number of match details kept in memory
    pub const MATCH_DETAIL_CAPACITY: usize = 500;
}

/// Scheduler lane defaults
pub mod lanes {
    /// Match id listing: ~2.5 requests per second
    pub const MATCH_IDS_MAX_CONCURRENT: usize = 1;
    pub const MATCH_IDS_MIN_INTERVAL_MS: u64 = 400;

    /// Match detail: ~0.8 requests per second, safe for development keys
    pub const MATCH_DETAIL_MAX_CONCURRENT: usize = 1;
    pub const MATCH_DETAIL_MIN_INTERVAL_MS: u64 = 1200;

    /// Match timeline shares the detail budget
    pub const MATCH_TIMELINE_MAX_CONCURRENT: usize = 1;
    pub const MATCH_TIMELINE_MIN_INTERVAL_MS: u64 = 1200;

    /// Account, summoner, mastery, league and spectator lookups
    pub const GENERAL_MAX_CONCURRENT: usize = 4;
    pub const GENERAL_MIN_INTERVAL_MS: u64 = 0;
}

/// Retry configuration
pub mod retry {
    /// Maximum number of re-enqueues after the first attempt
    pub const MAX_RETRIES: u32 = 3;

    /// Delay used for a 429 without a Retry-After hint
    pub const DEFAULT_RATE_LIMIT_DELAY_SECONDS: u64 = 1;

    /// Base delay for exponential backoff on timeouts and 5xx (milliseconds)
    pub const BASE_BACKOFF_MS: u64 = 250;

    /// Upper bound on random jitter added to backoff (milliseconds)
    pub const BACKOFF_JITTER_MS: u64 = 100;
}

/// Aggregator limits and defaults
pub mod limits {
    pub const OVERVIEW_DEFAULT_MATCHES: usize = 10;
    pub const OVERVIEW_MAX_MATCHES: usize = 20;
    pub const OVERVIEW_MASTERY_TOP: usize = 5;
    pub const OVERVIEW_CHAMPION_ROWS: usize = 8;

    pub const RECENT_DEFAULT_MATCHES: usize = 10;
    pub const RECENT_MAX_MATCHES: usize = 50;

    pub const CHAMPION_STATS_DEFAULT_MATCHES: usize = 20;

    pub const MASTERY_DEFAULT_TOP: usize = 20;
    pub const MASTERY_MAX_TOP: usize = 50;
}

/// Environment variable names
pub mod env_vars {
    /// The upstream credential; required at startup
    pub const API_KEY: &str = "RIOT_API_KEY";

    /// Host template override, mostly for local mocks
    pub const HOST_TEMPLATE: &str = "RIFT_HOST_TEMPLATE";

    /// HTTP timeout override in seconds
    pub const HTTP_TIMEOUT: &str = "RIFT_HTTP_TIMEOUT";

    /// Log file path override
    pub const LOG_FILE: &str = "RIFT_LOG_FILE";

    /// Default platform override
    pub const DEFAULT_PLATFORM: &str = "RIFT_DEFAULT_PLATFORM";
}
