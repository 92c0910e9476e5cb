//! Scheduler abstraction for the polling loop.
//!
//! A task is scheduled once; repeating cadence comes from the task re-arming
//! itself after its work settles, which keeps at most one poll in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::Notify;

/// Deferred unit of work.
pub type Task = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Runs tasks after a delay.
pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`, unless the returned handle is cancelled
    /// first.
    fn schedule(&self, delay: Duration, task: Task) -> ScheduleHandle;
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Cancellation handle of a scheduled task. Dropping it does not cancel.
#[derive(Debug, Clone, Default)]
pub struct ScheduleHandle {
    state: Arc<CancelState>,
}

impl ScheduleHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevent the task from running. No effect once it has started.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    async fn cancelled(&self) {
        while !self.is_cancelled() {
            self.state.notify.notified().await;
        }
    }
}

/// Scheduler backed by tokio timers. Must be used inside a tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        let guard = handle.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = guard.cancelled() => return,
            }
            if !guard.is_cancelled() {
                task().await;
            }
        });

        handle
    }
}

struct PendingTask {
    due: Duration,
    seq: u64,
    handle: ScheduleHandle,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// Scheduler on a virtual clock, driven explicitly with [`advance`].
///
/// Tasks run in due order (scheduling order for equal due times) on the
/// caller's task, so tests observe every state transition deterministically.
///
/// [`advance`]: ManualScheduler::advance
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.lock()
            .pending
            .iter()
            .filter(|p| !p.handle.is_cancelled())
            .count()
    }

    /// Delay until the next live task, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        let state = self.lock();
        state
            .pending
            .iter()
            .filter(|p| !p.handle.is_cancelled())
            .map(|p| p.due.saturating_sub(state.now))
            .min()
    }

    /// Move virtual time forward by `by`, running every task that falls due,
    /// including tasks scheduled by tasks run here. Returns how many ran.
    pub async fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now + by;
        let mut ran = 0;

        loop {
            let next = {
                let mut state = self.lock();
                state.pending.retain(|p| !p.handle.is_cancelled());

                let position = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(i, _)| i);

                match position {
                    Some(i) => {
                        let task = state.pending.swap_remove(i);
                        state.now = state.now.max(task.due);
                        Some(task.task)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            match next {
                Some(task) => {
                    task().await;
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduleHandle {
        let handle = ScheduleHandle::new();
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now + delay;
        state.pending.push(PendingTask {
            due,
            seq,
            handle: handle.clone(),
            task,
        });
        handle
    }
}
