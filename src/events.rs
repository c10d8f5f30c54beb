use std::sync::mpsc::{self, Receiver, Sender};

use serde::Serialize;

use crate::capability::Transcript;
use crate::focus::FocusView;
use crate::i18n::Translation;
use crate::keys::KeyPress;
use crate::models::{Notification, Settings, Task};

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
    pub settings: Settings,
    pub notification: Option<Notification>,
    pub focus: Option<FocusView>,
    pub settings_open: bool,
    pub listening: bool,
    pub live_transcript: String,
    pub translation: Translation,
}

/// Outbound notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    StateUpdated(Box<AppSnapshot>),
    FocusAddTaskInput,
    Escape,
    ShowHelp,
}

/// Inbound events the controller processes one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Transcript(Transcript),
    Key(KeyPress),
    NotificationExpired { generation: u64 },
    ListeningEnded,
}

/// Fan-out publish/subscribe. Dropped subscribers are pruned on the next publish.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<UiEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<UiEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: UiEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_every_event() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();
        bus.publish(UiEvent::Escape);
        bus.publish(UiEvent::ShowHelp);

        assert_eq!(a.try_iter().collect::<Vec<_>>(), vec![UiEvent::Escape, UiEvent::ShowHelp]);
        assert_eq!(b.try_iter().count(), 2);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(UiEvent::FocusAddTaskInput);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.try_recv().unwrap(), UiEvent::FocusAddTaskInput);
    }
}
