//! Sync client configuration.

use std::time::Duration;

/// Timing of the sync client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Delay between the end of one poll and the start of the next.
    pub poll_interval: Duration,
    /// How long the "new updates" badge stays up unless acknowledged.
    pub new_entries_display: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            new_entries_display: Duration::from_secs(5),
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: secs_from_env("LIVE_BLOG_POLL_INTERVAL_SECS")
                .unwrap_or(defaults.poll_interval),
            new_entries_display: secs_from_env("LIVE_BLOG_NEW_ENTRIES_DISPLAY_SECS")
                .unwrap_or(defaults.new_entries_display),
        }
    }
}

fn secs_from_env(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
