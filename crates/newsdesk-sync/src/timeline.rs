//! Client-side timeline: dedup set, merge and cursor.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use newsdesk_shared::dto::TimelineEntryResponse;
use uuid::Uuid;

/// Timestamp of the newest entry this session has seen.
///
/// Only ever moves forward. A fresh cursor means "fetch everything".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCursor {
    last_seen_created_at: Option<DateTime<Utc>>,
}

impl SyncCursor {
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen_created_at
    }

    /// Move the cursor to `at` if that is later than the current position.
    pub fn advance_to(&mut self, at: DateTime<Utc>) {
        if self.last_seen_created_at.is_none_or(|seen| at > seen) {
            self.last_seen_created_at = Some(at);
        }
    }
}

/// What a merge changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Entries that were not held before.
    pub added: usize,
    /// Known entries whose pin flag changed.
    pub pin_changes: usize,
}

impl MergeOutcome {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.pin_changes == 0
    }
}

/// Entries held by one client, newest first.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntryResponse>,
    ids: HashSet<Uuid>,
    cursor: SyncCursor,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a full load.
    pub fn from_entries(entries: Vec<TimelineEntryResponse>) -> Self {
        let mut timeline = Self::new();
        timeline.merge(entries);
        timeline
    }

    /// Merge a fetched batch (newest first).
    ///
    /// Already-held entries are not re-added; only their pin flag is taken
    /// over. New entries are prepended in the order received. Merging the
    /// same batch twice changes nothing.
    pub fn merge(&mut self, fetched: Vec<TimelineEntryResponse>) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let mut fresh = Vec::new();

        for entry in fetched {
            self.cursor.advance_to(entry.created_at);

            if self.ids.contains(&entry.id) {
                if let Some(known) = self.entries.iter_mut().find(|e| e.id == entry.id) {
                    if known.is_pinned != entry.is_pinned {
                        known.is_pinned = entry.is_pinned;
                        outcome.pin_changes += 1;
                    }
                }
                continue;
            }

            self.ids.insert(entry.id);
            fresh.push(entry);
        }

        outcome.added = fresh.len();
        if !fresh.is_empty() {
            fresh.append(&mut self.entries);
            self.entries = fresh;
        }

        outcome
    }

    /// Align pin flags with the authoritative set of pinned ids.
    /// Returns the number of entries changed.
    pub fn reconcile_pins(&mut self, pinned_ids: &[Uuid]) -> usize {
        let pinned: HashSet<&Uuid> = pinned_ids.iter().collect();
        let mut changed = 0;

        for entry in &mut self.entries {
            let should_pin = pinned.contains(&entry.id);
            if entry.is_pinned != should_pin {
                entry.is_pinned = should_pin;
                changed += 1;
            }
        }

        changed
    }

    /// Update one held entry's pin flag. Returns false if it is not held.
    pub fn set_pinned(&mut self, entry_id: Uuid, pinned: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.is_pinned = pinned;
                true
            }
            None => false,
        }
    }

    /// Drop a held entry. The cursor is left where it is.
    pub fn remove(&mut self, entry_id: Uuid) -> bool {
        if !self.ids.remove(&entry_id) {
            return false;
        }
        self.entries.retain(|e| e.id != entry_id);
        true
    }

    pub fn cursor(&self) -> SyncCursor {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry_id: Uuid) -> bool {
        self.ids.contains(&entry_id)
    }

    /// Every held entry, newest first.
    pub fn entries(&self) -> &[TimelineEntryResponse] {
        &self.entries
    }

    /// Pinned entries, newest first.
    pub fn pinned(&self) -> Vec<TimelineEntryResponse> {
        self.entries.iter().filter(|e| e.is_pinned).cloned().collect()
    }

    /// The regular timeline: unpinned entries, newest first.
    pub fn chronological(&self) -> Vec<TimelineEntryResponse> {
        self.entries.iter().filter(|e| !e.is_pinned).cloned().collect()
    }
}

/// Group entries (newest first) by UTC calendar day, keeping their order.
pub fn group_by_day(
    entries: &[TimelineEntryResponse],
) -> Vec<(NaiveDate, Vec<TimelineEntryResponse>)> {
    let mut groups: Vec<(NaiveDate, Vec<TimelineEntryResponse>)> = Vec::new();

    for entry in entries {
        let day = entry.created_at.date_naive();
        match groups.last_mut() {
            Some((current, bucket)) if *current == day => bucket.push(entry.clone()),
            _ => groups.push((day, vec![entry.clone()])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(secs: i64) -> TimelineEntryResponse {
        TimelineEntryResponse {
            id: Uuid::new_v4(),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            content: format!("update at {}", secs),
            image_url: None,
            image_alt: None,
            author_name: None,
            is_pinned: false,
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let batch = vec![entry(30), entry(20), entry(10)];
        let mut timeline = Timeline::new();

        let first = timeline.merge(batch.clone());
        let second = timeline.merge(batch);

        assert_eq!(first.added, 3);
        assert!(second.is_empty());
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn test_new_entries_are_prepended_in_order() {
        let mut timeline = Timeline::from_entries(vec![entry(20), entry(10)]);
        let newer = vec![entry(40), entry(30)];
        let expected: Vec<Uuid> = newer.iter().map(|e| e.id).collect();

        timeline.merge(newer);

        let ids: Vec<Uuid> = timeline.entries().iter().take(2).map(|e| e.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(timeline.len(), 4);
    }

    #[test]
    fn test_cursor_never_moves_backward() {
        let mut timeline = Timeline::from_entries(vec![entry(30)]);
        let at_30 = timeline.cursor();

        timeline.merge(vec![entry(5)]);
        assert_eq!(timeline.cursor(), at_30);

        timeline.merge(vec![entry(45)]);
        assert_eq!(
            timeline.cursor().last_seen(),
            Some(Utc.timestamp_opt(45, 0).unwrap())
        );
    }

    #[test]
    fn test_pin_change_updates_in_place() {
        let older = entry(10);
        let mut timeline = Timeline::from_entries(vec![entry(20), older.clone()]);

        let mut pinned = older.clone();
        pinned.is_pinned = true;
        let outcome = timeline.merge(vec![pinned]);

        assert_eq!(outcome, MergeOutcome { added: 0, pin_changes: 1 });
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.entries()[1].id, older.id);
        assert!(timeline.entries()[1].is_pinned);
        assert_eq!(timeline.pinned().len(), 1);
        assert_eq!(timeline.chronological().len(), 1);
    }

    #[test]
    fn test_reconcile_pins() {
        let a = entry(20);
        let mut b = entry(10);
        b.is_pinned = true;
        let mut timeline = Timeline::from_entries(vec![a.clone(), b.clone()]);

        assert_eq!(timeline.reconcile_pins(&[a.id]), 2);
        assert!(timeline.entries()[0].is_pinned);
        assert!(!timeline.entries()[1].is_pinned);
        assert_eq!(timeline.reconcile_pins(&[a.id]), 0);
    }

    #[test]
    fn test_duplicate_within_one_batch_is_added_once() {
        let e = entry(10);
        let mut timeline = Timeline::new();
        assert_eq!(timeline.merge(vec![e.clone(), e]).added, 1);
    }

    #[test]
    fn test_remove_keeps_cursor() {
        let newest = entry(30);
        let mut timeline = Timeline::from_entries(vec![newest.clone(), entry(10)]);

        assert!(timeline.remove(newest.id));
        assert!(!timeline.remove(newest.id));
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.cursor().last_seen(), Some(newest.created_at));
    }

    #[test]
    fn test_group_by_day() {
        let day = 86_400;
        let entries = vec![entry(day + 20), entry(day + 10), entry(50)];

        let groups = group_by_day(&entries);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 1);
        assert!(groups[0].0 > groups[1].0);
    }
}
