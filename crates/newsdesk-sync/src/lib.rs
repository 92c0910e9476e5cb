//! # Newsdesk Sync
//!
//! The viewer-side half of live blog coverage. A [`LiveBlogSync`] is created
//! when a live blog view mounts and disposed when it unmounts. While the blog
//! is live it polls the incremental endpoint, merges new entries without
//! duplicates or reordering, reconciles pins and stops polling once coverage
//! ends.
//!
//! Time is injected through the [`Scheduler`] trait and the network through
//! the [`EntryFeed`] trait, so the state machine runs identically under
//! tokio timers and under the [`ManualScheduler`] used in tests.
//!
//! The editor-side [`EditorialDesk`] applies changes to its local list only
//! after the store accepted them.

pub mod client;
pub mod config;
pub mod editor;
pub mod error;
pub mod feed;
pub mod scheduler;
pub mod timeline;

pub use client::{BlogHeader, LiveBlogSync, SyncPhase, TimelineSnapshot};
pub use config::SyncConfig;
pub use editor::{EditorialApi, EditorialDesk, HttpEditorialApi};
pub use error::SyncError;
pub use feed::{EntryFeed, HttpEntryFeed};
pub use scheduler::{ManualScheduler, ScheduleHandle, Scheduler, TokioScheduler};
pub use timeline::{MergeOutcome, SyncCursor, Timeline};
