//! Domain entities - the core business objects.

mod live_blog;
mod timeline_entry;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

pub use live_blog::{LiveBlog, LiveBlogPatch, validate_slug};
pub use timeline_entry::{NewTimelineEntry, TimelineEntry, next_entry_timestamp, newest_first};

/// Drop sub-microsecond precision so timestamps survive a round trip
/// through `timestamptz` unchanged.
pub fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::microseconds(1)).unwrap_or(ts)
}
