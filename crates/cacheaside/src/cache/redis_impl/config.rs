/// Connection settings for the Redis cache backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    /// Connection URL, e.g. `"redis://localhost:6379"`.
    pub url: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>, connect_timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            connect_timeout_secs,
        }
    }
}
