/// Storefront configuration
///
/// # Environment variables
///
/// Every setting can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | STORE_URL | http://localhost:54321 | Hosted store base URL |
/// | STORE_API_KEY | (empty) | API key sent as `apikey` + bearer token |
/// | STORE_TABLE | orders | Table name |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout (millis) |
/// | HISTORY_WINDOW_DAYS | 2 | Recency window for the historical view |
/// | SLOT_MINUTES | 10 | Pickup slot granularity |
/// | OPEN_HOUR | 7 | First pickup hour (UTC, inclusive) |
/// | CLOSE_HOUR | 19 | Last pickup hour (UTC, exclusive) |
/// | CONFIRMATION_KEY | besos_order_confirmation | Device storage key |
/// | FEED_CAPACITY | 1024 | Realtime broadcast channel capacity |
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted store base URL
    pub store_url: String,
    /// API key for the hosted store
    pub store_api_key: String,
    /// Orders table name
    pub store_table: String,
    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// How many days back the historical view reaches
    pub history_window_days: i64,
    /// Pickup slot granularity in minutes
    pub slot_minutes: u32,
    /// First bookable hour of the day (inclusive)
    pub open_hour: u32,
    /// Hour the pickup window closes (exclusive)
    pub close_hour: u32,
    /// Device storage key for the confirmation snapshot
    pub confirmation_key: String,
    /// Capacity of the change-event broadcast channel
    pub feed_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            store_url: std::env::var("STORE_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            store_api_key: std::env::var("STORE_API_KEY").unwrap_or_default(),
            store_table: std::env::var("STORE_TABLE").unwrap_or_else(|_| "orders".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            history_window_days: std::env::var("HISTORY_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            slot_minutes: std::env::var("SLOT_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            open_hour: std::env::var("OPEN_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            close_hour: std::env::var("CLOSE_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(19),
            confirmation_key: std::env::var("CONFIRMATION_KEY")
                .unwrap_or_else(|_| "besos_order_confirmation".into()),
            feed_capacity: std::env::var("FEED_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
        }
    }

    /// Override the store connection settings
    ///
    /// Mostly used by tests
    pub fn with_store(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.store_url = url.into();
        config.store_api_key = api_key.into();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
