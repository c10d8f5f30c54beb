use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// One-shot delayed callbacks that can be cancelled before they fire.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, job: Job) -> TimerId;
    /// Cancelling a timer that already fired is a no-op.
    fn cancel(&self, id: TimerId);
}

pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    timers: Arc<Mutex<HashMap<u64, JoinHandle<()>>>>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Timers that are armed and have neither fired nor been cancelled.
    pub fn active(&self) -> usize {
        self.timers.lock().expect("timers poisoned").len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, job: Job) -> TimerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);
        // Held across spawn so the task cannot remove its entry before it is inserted.
        let mut guard = self.timers.lock().expect("timers poisoned");
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            timers.lock().expect("timers poisoned").remove(&id);
            job();
        });
        guard.insert(id, handle);
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        let handle = self.timers.lock().expect("timers poisoned").remove(&id.0);
        if let Some(handle) = handle {
            handle.abort();
            log::trace!("timer cancelled id={}", id.0);
        }
    }
}

/// Virtual-clock scheduler driven by explicit `advance` calls.
#[derive(Default)]
pub struct ManualScheduler {
    inner: Mutex<ManualState>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    pending: Vec<(u64, Duration, Job)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.inner.lock().expect("scheduler poisoned").now
    }

    pub fn pending(&self) -> usize {
        self.inner.lock().expect("scheduler poisoned").pending.len()
    }

    /// Moves the clock forward, running due jobs in deadline order.
    /// Returns how many jobs ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        loop {
            let job = {
                let mut guard = self.inner.lock().expect("scheduler poisoned");
                let next = guard
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, due, _))| *due <= target)
                    .min_by_key(|(_, (id, due, _))| (*due, *id))
                    .map(|(index, _)| index);
                match next {
                    Some(index) => {
                        let (_, due, job) = guard.pending.remove(index);
                        guard.now = due;
                        job
                    }
                    None => {
                        guard.now = target;
                        break;
                    }
                }
            };
            job();
            ran += 1;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, job: Job) -> TimerId {
        let mut guard = self.inner.lock().expect("scheduler poisoned");
        guard.next_id += 1;
        let id = guard.next_id;
        let due = guard.now + delay;
        guard.pending.push((id, due, job));
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        let mut guard = self.inner.lock().expect("scheduler poisoned");
        guard.pending.retain(|(pending_id, _, _)| *pending_id != id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Job) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |label: &'static str| -> Job {
            let sink = Arc::clone(&sink);
            Box::new(move || sink.lock().unwrap().push(label))
        };
        (log, make)
    }

    #[test]
    fn manual_runs_jobs_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let (log, job) = recorder();
        scheduler.schedule(Duration::from_millis(200), job("late"));
        scheduler.schedule(Duration::from_millis(0), job("now"));
        scheduler.schedule(Duration::from_millis(100), job("mid"));

        assert_eq!(scheduler.advance(Duration::from_millis(150)), 2);
        assert_eq!(*log.lock().unwrap(), vec!["now", "mid"]);
        assert_eq!(scheduler.now(), Duration::from_millis(150));
        assert_eq!(scheduler.pending(), 1);

        assert_eq!(scheduler.advance(Duration::from_millis(50)), 1);
        assert_eq!(*log.lock().unwrap(), vec!["now", "mid", "late"]);
    }

    #[test]
    fn manual_cancel_drops_the_job() {
        let scheduler = ManualScheduler::new();
        let (log, job) = recorder();
        let id = scheduler.schedule(Duration::from_millis(10), job("cancelled"));
        scheduler.cancel(id);
        scheduler.cancel(id);
        assert_eq!(scheduler.advance(Duration::from_secs(1)), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_fires_and_cancels() {
        let scheduler = TokioScheduler::new(Handle::current());
        let fired = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&fired);
        scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let counter = Arc::clone(&fired);
        let cancelled = scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                counter.fetch_add(10, Ordering::SeqCst);
            }),
        );
        assert_eq!(scheduler.active(), 2);
        scheduler.cancel(cancelled);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.active(), 0);
    }
}
