use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::truncate_to_micros;
use crate::error::DomainError;

/// Timeline entry - one timestamped update within a live blog.
///
/// Entries are append-only: only `is_pinned` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: Uuid,
    pub blog_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub author_name: Option<String>,
    pub is_pinned: bool,
}

/// Editor-submitted entry. Id and timestamp are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewTimelineEntry {
    pub content: String,
    pub image_url: Option<String>,
    pub image_alt: Option<String>,
    pub author_name: Option<String>,
}

impl NewTimelineEntry {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Entry content must not be empty".to_string(),
            ));
        }
        if self.image_alt.is_some() && self.image_url.is_none() {
            return Err(DomainError::Validation(
                "Image alt text given without an image".to_string(),
            ));
        }
        Ok(())
    }

    /// Materialize the draft with its store-assigned timestamp.
    pub fn into_entry(self, blog_id: Uuid, created_at: DateTime<Utc>) -> TimelineEntry {
        TimelineEntry {
            id: Uuid::new_v4(),
            blog_id,
            created_at,
            content: self.content,
            image_url: self.image_url,
            image_alt: self.image_alt,
            author_name: self.author_name,
            is_pinned: false,
        }
    }
}

/// Total order of a timeline: newest first, ties broken by id (descending).
pub fn newest_first(a: &TimelineEntry, b: &TimelineEntry) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Timestamp for the next entry of a blog whose newest entry is `newest`.
///
/// Strictly greater than every existing entry even when the wall clock stalls
/// or steps back, so a reader holding an exclusive cursor never skips it.
pub fn next_entry_timestamp(now: DateTime<Utc>, newest: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = truncate_to_micros(now);
    match newest {
        Some(last) if now <= last => last + TimeDelta::microseconds(1),
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn entry(secs: i64) -> TimelineEntry {
        NewTimelineEntry {
            content: format!("update at {}", secs),
            ..Default::default()
        }
        .into_entry(Uuid::new_v4(), at(secs))
    }

    #[test]
    fn test_next_timestamp_uses_clock_when_ahead() {
        assert_eq!(next_entry_timestamp(at(20), Some(at(10))), at(20));
        assert_eq!(next_entry_timestamp(at(20), None), at(20));
    }

    #[test]
    fn test_next_timestamp_is_strictly_increasing_when_clock_stalls() {
        let next = next_entry_timestamp(at(10), Some(at(10)));
        assert_eq!(next, at(10) + TimeDelta::microseconds(1));

        let behind = next_entry_timestamp(at(5), Some(at(10)));
        assert!(behind > at(10));
    }

    #[test]
    fn test_newest_first_orders_by_time_then_id() {
        let mut entries = vec![entry(10), entry(30), entry(20)];
        entries.sort_by(newest_first);
        let times: Vec<_> = entries.iter().map(|e| e.created_at.timestamp()).collect();
        assert_eq!(times, vec![30, 20, 10]);

        let mut a = entry(40);
        let mut b = entry(40);
        a.id = Uuid::from_u128(1);
        b.id = Uuid::from_u128(2);
        assert_eq!(newest_first(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_draft_validation() {
        let blank = NewTimelineEntry {
            content: "   ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());

        let orphan_alt = NewTimelineEntry {
            content: "Photo".to_string(),
            image_alt: Some("Crowd outside".to_string()),
            ..Default::default()
        };
        assert!(orphan_alt.validate().is_err());
    }
}
