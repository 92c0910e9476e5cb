//! The live blog sync client.
//!
//! One [`LiveBlogSync`] exists per mounted live blog view. It owns the
//! cursor, the local timeline and the timers, and publishes a
//! [`TimelineSnapshot`] on a watch channel whenever something visible
//! changes. Viewing another blog means disposing this client and opening a
//! new one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::NaiveDate;
use newsdesk_shared::dto::{LiveBlogResponse, PollEntriesResponse, TimelineEntryResponse};
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::feed::EntryFeed;
use crate::scheduler::{ScheduleHandle, Scheduler, Task};
use crate::timeline::{SyncCursor, Timeline, group_by_day};

/// Lifecycle of a sync client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncPhase {
    /// Full load not finished yet.
    #[default]
    Loading,
    /// Polling for new entries.
    Live,
    /// Coverage is over. Nothing is scheduled.
    Ended,
    /// The full load failed. Not retried.
    Failed(String),
    /// Torn down. Late responses are dropped.
    Disposed,
}

/// Blog metadata as last reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogHeader {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub summary: Option<String>,
    pub is_live: bool,
}

impl From<&LiveBlogResponse> for BlogHeader {
    fn from(blog: &LiveBlogResponse) -> Self {
        Self {
            id: blog.id,
            slug: blog.slug.clone(),
            title: blog.title.clone(),
            excerpt: blog.excerpt.clone(),
            summary: blog.summary.clone(),
            is_live: blog.is_live,
        }
    }
}

/// Everything a presenter needs to render the blog.
#[derive(Debug, Clone, Default)]
pub struct TimelineSnapshot {
    pub phase: SyncPhase,
    pub blog: Option<BlogHeader>,
    /// Pinned entries, shown above the timeline. Newest first.
    pub pinned: Vec<TimelineEntryResponse>,
    /// Unpinned entries, newest first.
    pub timeline: Vec<TimelineEntryResponse>,
    /// Entries merged since the badge was last cleared.
    pub new_entries: usize,
    pub cursor: SyncCursor,
}

impl TimelineSnapshot {
    /// The regular timeline split into UTC calendar days, newest day first.
    pub fn grouped_by_day(&self) -> Vec<(NaiveDate, Vec<TimelineEntryResponse>)> {
        group_by_day(&self.timeline)
    }

    pub fn total_entries(&self) -> usize {
        self.pinned.len() + self.timeline.len()
    }

    /// Recap of ended coverage, if one was written.
    pub fn summary(&self) -> Option<&str> {
        self.blog.as_ref().and_then(|b| b.summary.as_deref())
    }
}

#[derive(Default)]
struct SyncState {
    phase: SyncPhase,
    blog: Option<BlogHeader>,
    timeline: Timeline,
    new_entries: usize,
    in_flight: bool,
    next_poll: Option<ScheduleHandle>,
    clear_badge: Option<ScheduleHandle>,
}

impl SyncState {
    fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            phase: self.phase.clone(),
            blog: self.blog.clone(),
            pinned: self.timeline.pinned(),
            timeline: self.timeline.chronological(),
            new_entries: self.new_entries,
            cursor: self.timeline.cursor(),
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.next_poll.take() {
            handle.cancel();
        }
        if let Some(handle) = self.clear_badge.take() {
            handle.cancel();
        }
    }
}

struct Shared {
    slug: String,
    feed: Arc<dyn EntryFeed>,
    scheduler: Arc<dyn Scheduler>,
    config: SyncConfig,
    disposed: AtomicBool,
    state: Mutex<SyncState>,
    updates: watch::Sender<TimelineSnapshot>,
}

/// Sync client for one live blog.
pub struct LiveBlogSync {
    shared: Arc<Shared>,
}

impl LiveBlogSync {
    /// Create an idle client. Call [`start`](Self::start) to load.
    pub fn new(
        slug: impl Into<String>,
        feed: Arc<dyn EntryFeed>,
        scheduler: Arc<dyn Scheduler>,
        config: SyncConfig,
    ) -> Self {
        let (updates, _) = watch::channel(TimelineSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                slug: slug.into(),
                feed,
                scheduler,
                config,
                disposed: AtomicBool::new(false),
                state: Mutex::new(SyncState::default()),
                updates,
            }),
        }
    }

    /// Create a client and run the full load.
    pub async fn open(
        slug: impl Into<String>,
        feed: Arc<dyn EntryFeed>,
        scheduler: Arc<dyn Scheduler>,
        config: SyncConfig,
    ) -> Self {
        let sync = Self::new(slug, feed, scheduler, config);
        sync.start().await;
        sync
    }

    /// Run the full load. On success the client goes `Live` (and arms the
    /// first poll) or `Ended`; on failure it stays `Failed`.
    pub async fn start(&self) {
        self.shared.load().await;
    }

    pub fn subscribe(&self) -> watch::Receiver<TimelineSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        self.shared.lock().snapshot()
    }

    pub fn phase(&self) -> SyncPhase {
        self.shared.lock().phase.clone()
    }

    pub fn slug(&self) -> &str {
        &self.shared.slug
    }

    /// Poll immediately instead of waiting for the next tick. No-op unless
    /// the client is live with no poll in flight.
    pub async fn poll_now(&self) {
        self.shared.poll().await;
    }

    /// Clear the "new updates" badge, e.g. when the reader scrolls to the top.
    pub fn acknowledge_new_entries(&self) {
        if let Some(handle) = self.shared.lock().clear_badge.take() {
            handle.cancel();
        }
        self.shared.clear_new_entries();
    }

    /// Cancel all timers and drop every response still on its way.
    pub fn dispose(&self) {
        if self.shared.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        let snapshot = {
            let mut state = self.shared.lock();
            state.cancel_timers();
            state.in_flight = false;
            state.phase = SyncPhase::Disposed;
            state.snapshot()
        };
        self.shared.publish(snapshot);

        tracing::debug!(slug = %self.shared.slug, "Live blog sync disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.is_disposed()
    }
}

impl Drop for LiveBlogSync {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn publish(&self, snapshot: TimelineSnapshot) {
        self.updates.send_replace(snapshot);
    }

    async fn load(self: &Arc<Self>) {
        {
            let mut state = self.lock();
            if self.is_disposed() || state.phase != SyncPhase::Loading || state.in_flight {
                return;
            }
            state.in_flight = true;
        }

        let result = self.feed.load(&self.slug).await;

        if self.is_disposed() {
            tracing::trace!(slug = %self.slug, "Discarding load response after dispose");
            return;
        }

        let snapshot = {
            let mut state = self.lock();
            state.in_flight = false;

            match result {
                Ok(blog) => {
                    let header = BlogHeader::from(&blog);
                    state.timeline = Timeline::from_entries(blog.entries);
                    state.phase = if header.is_live {
                        SyncPhase::Live
                    } else {
                        SyncPhase::Ended
                    };

                    tracing::info!(
                        slug = %self.slug,
                        blog_id = %header.id,
                        entries = state.timeline.len(),
                        is_live = header.is_live,
                        "Live blog loaded"
                    );

                    state.blog = Some(header);
                    if state.phase == SyncPhase::Live {
                        self.arm_poll(&mut state);
                    }
                }
                Err(e) => {
                    tracing::warn!(slug = %self.slug, error = %e, "Live blog load failed");
                    state.phase = SyncPhase::Failed(e.to_string());
                }
            }

            state.snapshot()
        };
        self.publish(snapshot);
    }

    async fn poll(self: &Arc<Self>) {
        let (blog_id, since) = {
            let mut state = self.lock();
            if self.is_disposed() || state.phase != SyncPhase::Live || state.in_flight {
                return;
            }
            let Some(blog_id) = state.blog.as_ref().map(|b| b.id) else {
                return;
            };
            state.in_flight = true;
            if let Some(handle) = state.next_poll.take() {
                handle.cancel();
            }
            (blog_id, state.timeline.cursor().last_seen())
        };

        let result = self.feed.poll(blog_id, since).await;

        if self.is_disposed() {
            tracing::trace!(blog_id = %blog_id, "Discarding poll response after dispose");
            return;
        }

        let snapshot = {
            let mut state = self.lock();
            state.in_flight = false;

            let changed = match result {
                Ok(response) => self.apply_poll(&mut state, response),
                Err(e) => {
                    tracing::warn!(blog_id = %blog_id, error = %e, "Live blog poll failed");
                    false
                }
            };

            if state.phase == SyncPhase::Live {
                self.arm_poll(&mut state);
            }

            changed.then(|| state.snapshot())
        };

        if let Some(snapshot) = snapshot {
            self.publish(snapshot);
        }
    }

    /// Fold one poll response into local state. Returns whether anything
    /// visible changed.
    fn apply_poll(self: &Arc<Self>, state: &mut SyncState, response: PollEntriesResponse) -> bool {
        let outcome = state.timeline.merge(response.entries);
        let repinned = response
            .pinned_ids
            .as_deref()
            .map(|ids| state.timeline.reconcile_pins(ids))
            .unwrap_or(0);

        if outcome.added > 0 {
            state.new_entries += outcome.added;
            self.arm_badge_clear(state);
        }

        tracing::debug!(
            slug = %self.slug,
            added = outcome.added,
            pin_changes = outcome.pin_changes + repinned,
            is_live = response.is_live,
            "Merged poll response"
        );

        if response.is_live {
            return !outcome.is_empty() || repinned > 0;
        }

        if let Some(blog) = state.blog.as_mut() {
            blog.is_live = false;
            blog.summary = response.summary;
        }
        state.phase = SyncPhase::Ended;
        if let Some(handle) = state.next_poll.take() {
            handle.cancel();
        }

        tracing::info!(slug = %self.slug, "Live blog coverage ended, polling stopped");
        true
    }

    fn arm_poll(self: &Arc<Self>, state: &mut SyncState) {
        let weak = Arc::downgrade(self);
        let task: Task = Box::new(move || {
            Box::pin(async move {
                if let Some(shared) = Weak::upgrade(&weak) {
                    shared.poll().await;
                }
            })
        });

        let handle = self.scheduler.schedule(self.config.poll_interval, task);
        if let Some(previous) = state.next_poll.replace(handle) {
            previous.cancel();
        }
    }

    fn arm_badge_clear(self: &Arc<Self>, state: &mut SyncState) {
        let weak = Arc::downgrade(self);
        let task: Task = Box::new(move || {
            Box::pin(async move {
                if let Some(shared) = Weak::upgrade(&weak) {
                    shared.lock().clear_badge = None;
                    shared.clear_new_entries();
                }
            })
        });

        let handle = self
            .scheduler
            .schedule(self.config.new_entries_display, task);
        if let Some(previous) = state.clear_badge.replace(handle) {
            previous.cancel();
        }
    }

    fn clear_new_entries(&self) {
        let snapshot = {
            let mut state = self.lock();
            if self.is_disposed() || state.new_entries == 0 {
                return;
            }
            state.new_entries = 0;
            state.snapshot()
        };
        self.publish(snapshot);
    }
}
