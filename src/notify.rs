use std::sync::Arc;
use std::time::Duration;

use crate::feedback::FeedbackSignaler;
use crate::models::Notification;
use crate::scheduler::{Scheduler, TimerId};

pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3000);

/// Called from the timer with the generation it was armed for.
pub type ExpiryHook = Arc<dyn Fn(u64) + Send + Sync>;

/// Holds at most one transient message. A newer message replaces the old one
/// and restarts the auto-clear timer.
pub struct NotificationQueue {
    current: Option<Notification>,
    generation: u64,
    timer: Option<TimerId>,
    scheduler: Arc<dyn Scheduler>,
    signaler: FeedbackSignaler,
    on_expire: ExpiryHook,
}

impl NotificationQueue {
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        signaler: FeedbackSignaler,
        on_expire: ExpiryHook,
    ) -> Self {
        Self {
            current: None,
            generation: 0,
            timer: None,
            scheduler,
            signaler,
            on_expire,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn show(&mut self, notification: Notification, audio_enabled: bool) -> u64 {
        self.cancel_timer();
        self.generation += 1;
        let generation = self.generation;
        let kind = notification.kind;
        log::debug!(
            "notification kind={} generation={generation}",
            kind.as_str()
        );
        self.current = Some(notification);

        let on_expire = Arc::clone(&self.on_expire);
        self.timer = Some(self.scheduler.schedule(
            NOTIFICATION_TIMEOUT,
            Box::new(move || on_expire(generation)),
        ));

        if audio_enabled {
            self.signaler.signal(kind);
        }
        generation
    }

    /// Clears the message if `generation` is still the live one.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.current.is_none() {
            return false;
        }
        self.timer = None;
        self.current = None;
        true
    }

    pub fn dismiss(&mut self) -> bool {
        self.cancel_timer();
        self.current.take().is_some()
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
    }
}
