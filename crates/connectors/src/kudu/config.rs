use serde::{Deserialize, Serialize};

/// What the decoder does when a `unixtime_micros` cell cannot be read as a
/// timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFallback {
    /// Substitute the raw microsecond value divided by 1000 (milliseconds).
    #[default]
    Millis,
    /// Propagate the timestamp error.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub timestamp_fallback: TimestampFallback,
}

impl ReaderConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_timestamp_fallback(mut self, fallback: TimestampFallback) -> Self {
        self.timestamp_fallback = fallback;
        self
    }
}
