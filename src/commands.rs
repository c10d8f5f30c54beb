use std::sync::mpsc::Receiver;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc::UnboundedSender;

use crate::capability::{
    SpeechRecognizer, SpeechSynthesizer, ToneEmitter, Transcript, Utterance,
};
use crate::error::{SettingsError, TaskError};
use crate::events::{AppEvent, AppSnapshot, EventBus, UiEvent};
use crate::feedback::{tone_sequence_for_label, FeedbackSignaler};
use crate::focus::{FocusNavigator, FocusView};
use crate::i18n::{speech_code, translation, VOICE_HELP};
use crate::intent::{interpret, Intent};
use crate::keys::{resolve, KeyAction, KeyPress};
use crate::models::{
    Category, Notification, NotificationKind, Priority, Settings, SettingsPatch, Task,
};
use crate::notify::NotificationQueue;
use crate::scheduler::Scheduler;
use crate::settings::{load_settings, parse_patch, save_settings, SettingsStore};
use crate::storage::{load_tasks, save_tasks, KeyValueStore};
use crate::tasks::{TaskOutcome, TaskStore};

/// External collaborators handed to the controller.
pub struct Capabilities {
    pub store: Box<dyn KeyValueStore>,
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
    pub tones: Arc<dyn ToneEmitter>,
    pub scheduler: Arc<dyn Scheduler>,
}

/// Application controller. Each call runs to completion; timers talk back
/// through the `AppEvent` channel instead of touching state directly.
pub struct App {
    tasks: TaskStore,
    settings: SettingsStore,
    focus: FocusNavigator,
    notifications: NotificationQueue,
    signaler: FeedbackSignaler,
    store: Box<dyn KeyValueStore>,
    recognizer: Box<dyn SpeechRecognizer>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    bus: EventBus,
    settings_open: bool,
    listening: bool,
    live_transcript: String,
}

impl App {
    pub fn new(
        caps: Capabilities,
        events: UnboundedSender<AppEvent>,
        tasks: Vec<Task>,
        settings: Settings,
    ) -> Self {
        let signaler = FeedbackSignaler::new(caps.tones, Arc::clone(&caps.scheduler));
        let notifications = NotificationQueue::new(
            caps.scheduler,
            signaler.clone(),
            Arc::new(move |generation| {
                // The receiver is gone only during shutdown.
                let _ = events.send(AppEvent::NotificationExpired { generation });
            }),
        );
        let mut app = Self {
            tasks: TaskStore::new(tasks),
            settings: SettingsStore::new(settings),
            focus: FocusNavigator::default(),
            notifications,
            signaler,
            store: caps.store,
            recognizer: caps.recognizer,
            synthesizer: caps.synthesizer,
            bus: EventBus::new(),
            settings_open: false,
            listening: false,
            live_transcript: String::new(),
        };
        app.sync_focus();
        app
    }

    /// Restores tasks and settings from the store. Corrupt records are logged
    /// and replaced by an empty list or the default settings.
    pub fn load(caps: Capabilities, events: UnboundedSender<AppEvent>) -> Self {
        let tasks = load_tasks(caps.store.as_ref()).unwrap_or_else(|error| {
            log::error!("failed to load tasks: {error}");
            Vec::new()
        });
        let settings = load_settings(caps.store.as_ref()).unwrap_or_else(|error| {
            log::error!("failed to load settings: {error}");
            Settings::default()
        });
        log::info!(
            "state loaded tasks={} pending={}",
            tasks.len(),
            tasks.iter().filter(|task| !task.completed).count()
        );
        Self::new(caps, events, tasks, settings)
    }

    pub fn subscribe(&mut self) -> Receiver<UiEvent> {
        self.bus.subscribe()
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn focus_active(&self) -> bool {
        self.focus.is_active()
    }

    pub fn focus_cursor(&self) -> Option<usize> {
        self.focus.cursor()
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let settings = self.settings.get().clone();
        let pending = self.tasks.pending();
        let focus = if self.focus.is_active() {
            self.focus.current_task(&pending).ok().map(|task| {
                FocusView::new(
                    task,
                    self.focus.cursor().unwrap_or(0),
                    pending.len(),
                    &settings,
                    &Local,
                )
            })
        } else {
            None
        };
        AppSnapshot {
            pending: pending.into_iter().cloned().collect(),
            completed: self.tasks.completed().into_iter().cloned().collect(),
            notification: self.notifications.current().cloned(),
            focus,
            settings_open: self.settings_open,
            listening: self.listening,
            live_transcript: self.live_transcript.clone(),
            translation: *translation(settings.language),
            settings,
        }
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Transcript(transcript) => self.on_transcript(transcript),
            AppEvent::Key(press) => {
                self.handle_key(press);
            }
            AppEvent::NotificationExpired { generation } => {
                if self.notifications.expire(generation) {
                    self.publish_state();
                }
            }
            AppEvent::ListeningEnded => {
                self.listening = false;
                self.publish_state();
            }
        }
    }

    // --- tasks ---

    pub fn add_task(&mut self, text: &str, priority: Priority, category: Category) -> Option<Task> {
        let result = self.tasks.add(text, priority, category);
        self.apply_outcome(result)
    }

    pub fn toggle_task(&mut self, task_id: &str) -> Option<Task> {
        let result = self.tasks.toggle(task_id);
        self.apply_outcome(result)
    }

    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let result = self.tasks.remove(task_id);
        self.apply_outcome(result)
    }

    pub fn edit_task(&mut self, task_id: &str, new_text: &str) -> Option<Task> {
        let result = self.tasks.edit(task_id, new_text);
        self.apply_outcome(result)
    }

    fn apply_outcome(&mut self, result: Result<TaskOutcome, TaskError>) -> Option<Task> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                log::debug!("task mutation ignored: {error}");
                return None;
            }
        };
        log::info!("task {} id={}", outcome_name(&outcome), outcome.task().id);
        self.persist_tasks();
        self.sync_focus();
        self.notify(outcome.notification());
        Some(outcome.task().clone())
    }

    // --- settings ---

    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Settings {
        self.settings.update(patch);
        if !self.settings.get().voice_enabled {
            self.stop_listening();
        }
        self.sync_focus();
        self.persist_settings();
        self.publish_state();
        self.settings.get().clone()
    }

    /// Boundary entry for untyped input; out-of-domain values are rejected.
    pub fn update_settings_json(&mut self, json: &str) -> Result<Settings, SettingsError> {
        let patch = parse_patch(json)?;
        Ok(self.update_settings(&patch))
    }

    pub fn toggle_theme(&mut self) -> Settings {
        let theme = self.settings.get().theme.toggled();
        self.update_settings(&SettingsPatch::theme(theme))
    }

    pub fn toggle_settings_panel(&mut self) -> bool {
        self.settings_open = !self.settings_open;
        self.publish_state();
        self.settings_open
    }

    // --- focus mode ---

    /// Flips the focus-mode setting. Returns whether focus mode is now active;
    /// turning it on with no pending tasks is suppressed.
    pub fn toggle_focus_mode(&mut self) -> bool {
        let enabled = !self.settings.get().focus_mode;
        self.update_settings(&SettingsPatch::focus_mode(enabled));
        self.focus.is_active()
    }

    pub fn enter_focus(&mut self) -> bool {
        self.update_settings(&SettingsPatch::focus_mode(true));
        self.focus.is_active()
    }

    pub fn exit_focus(&mut self) {
        self.update_settings(&SettingsPatch::focus_mode(false));
    }

    pub fn focus_next(&mut self) {
        self.focus.next(self.tasks.pending_len());
        self.publish_state();
    }

    pub fn focus_previous(&mut self) {
        self.focus.previous(self.tasks.pending_len());
        self.publish_state();
    }

    pub fn complete_focused(&mut self) -> Option<Task> {
        let task_id = self.focused_task_id()?;
        self.toggle_task(&task_id)
    }

    pub fn remove_focused(&mut self) -> Option<Task> {
        let task_id = self.focused_task_id()?;
        self.remove_task(&task_id)
    }

    fn focused_task_id(&self) -> Option<String> {
        if !self.focus.is_active() {
            return None;
        }
        let pending = self.tasks.pending();
        match self.focus.current_task(&pending) {
            Ok(task) => Some(task.id.clone()),
            Err(error) => {
                log::debug!("focus action ignored: {error}");
                None
            }
        }
    }

    /// Keeps the navigator in line with the `focus_mode` setting and the pending view.
    fn sync_focus(&mut self) {
        let pending = self.tasks.pending_len();
        let wanted = self.settings.get().focus_mode;
        let still_on = match (wanted, self.focus.is_active()) {
            (true, false) => self.focus.enter(pending).is_ok(),
            (true, true) => self.focus.reconcile(pending),
            (false, true) => {
                self.focus.exit();
                return;
            }
            (false, false) => return,
        };
        if !still_on {
            log::debug!("focus mode off: no pending tasks");
            self.settings.update(&SettingsPatch::focus_mode(false));
            self.persist_settings();
        }
    }

    // --- voice ---

    /// Results that arrive after voice was disabled are dropped.
    pub fn on_transcript(&mut self, transcript: Transcript) {
        if !self.settings.get().voice_enabled {
            log::debug!("transcript dropped: voice disabled");
            return;
        }
        self.live_transcript = transcript.text.clone();
        if transcript.is_final {
            self.handle_utterance(&transcript.text);
        }
        self.publish_state();
    }

    pub fn handle_utterance(&mut self, utterance: &str) -> Intent {
        let intent = interpret(utterance);
        log::debug!("voice intent {intent:?}");
        match &intent {
            Intent::AddTask(text) => {
                self.add_task(text, Priority::default(), Category::default());
            }
            Intent::ToggleFocusMode => {
                let was_on = self.focus.is_active();
                let now_on = self.toggle_focus_mode();
                if was_on != now_on {
                    let message = if now_on {
                        "Focus mode enabled"
                    } else {
                        "Focus mode disabled"
                    };
                    self.notify(Notification::new(NotificationKind::Info, message));
                }
            }
            Intent::ReadTasks => {
                let text = self.read_tasks_text();
                self.speak(&text);
            }
            Intent::Unrecognized => {}
        }
        intent
    }

    /// Every task with its status word, or the "no tasks" line.
    pub fn read_tasks_text(&self) -> String {
        let t = translation(self.settings.get().language);
        if self.tasks.is_empty() {
            return t.no_tasks.to_string();
        }
        self.tasks
            .tasks()
            .iter()
            .map(|task| {
                let status = if task.completed { t.completed } else { t.pending };
                format!("{}, {}", task.text, status)
            })
            .collect::<Vec<_>>()
            .join(". ")
    }

    /// Speaks `text` if voice is enabled, interrupting anything already playing.
    pub fn speak(&mut self, text: &str) -> bool {
        let settings = self.settings.get();
        if !settings.voice_enabled {
            return false;
        }
        let utterance = Utterance::new(text, speech_code(settings.language));
        self.synthesizer.cancel();
        match self.synthesizer.speak(&utterance) {
            Ok(()) => true,
            Err(error) => {
                log::warn!("speech output failed: {error}");
                false
            }
        }
    }

    pub fn speak_voice_help(&mut self) -> bool {
        self.speak(VOICE_HELP)
    }

    pub fn start_listening(&mut self) -> bool {
        if !self.settings.get().voice_enabled || self.listening {
            return false;
        }
        self.synthesizer.cancel();
        let code = speech_code(self.settings.get().language);
        match self.recognizer.start(code) {
            Ok(()) => {
                self.listening = true;
                self.live_transcript.clear();
                self.publish_state();
                true
            }
            Err(error) => {
                log::warn!("speech recognition failed to start: {error}");
                false
            }
        }
    }

    pub fn stop_listening(&mut self) {
        if !self.listening {
            return;
        }
        self.recognizer.stop();
        self.listening = false;
        self.publish_state();
    }

    // --- keyboard ---

    pub fn handle_key(&mut self, press: KeyPress) -> Option<KeyAction> {
        let action = resolve(&press, self.focus.is_active())?;
        match action {
            KeyAction::FocusAddTaskInput => self.bus.publish(UiEvent::FocusAddTaskInput),
            KeyAction::ToggleFocusMode => {
                self.toggle_focus_mode();
            }
            KeyAction::ToggleSettingsPanel => {
                self.toggle_settings_panel();
            }
            KeyAction::ToggleTheme => {
                self.toggle_theme();
            }
            KeyAction::Escape => {
                self.settings_open = false;
                self.bus.publish(UiEvent::Escape);
                self.publish_state();
            }
            KeyAction::ShowHelp => self.bus.publish(UiEvent::ShowHelp),
            KeyAction::CompleteFocused => {
                self.complete_focused();
            }
            KeyAction::RemoveFocused => {
                self.remove_focused();
            }
            KeyAction::FocusPrevious => self.focus_previous(),
            KeyAction::FocusNext => self.focus_next(),
            KeyAction::ExitFocus => self.exit_focus(),
        }
        Some(action)
    }

    // --- notifications ---

    pub fn dismiss_notification(&mut self) {
        if self.notifications.dismiss() {
            self.publish_state();
        }
    }

    /// Plays the tone sequence for a feedback label regardless of the current notification.
    pub fn preview_feedback(&self, label: &str) {
        self.signaler.play_sequence(tone_sequence_for_label(label));
    }

    fn notify(&mut self, notification: Notification) {
        let audio = self.settings.get().audio_enabled;
        self.notifications.show(notification, audio);
        self.publish_state();
    }

    fn publish_state(&mut self) {
        if self.bus.subscriber_count() == 0 {
            return;
        }
        let snapshot = self.snapshot();
        self.bus.publish(UiEvent::StateUpdated(Box::new(snapshot)));
    }

    fn persist_tasks(&self) {
        if let Err(error) = save_tasks(self.store.as_ref(), self.tasks.tasks()) {
            log::warn!("failed to persist tasks: {error}");
        }
    }

    fn persist_settings(&self) {
        if let Err(error) = save_settings(self.store.as_ref(), self.settings.get()) {
            log::warn!("failed to persist settings: {error}");
        }
    }
}

fn outcome_name(outcome: &TaskOutcome) -> &'static str {
    match outcome {
        TaskOutcome::Added(_) => "added",
        TaskOutcome::Toggled(_) => "toggled",
        TaskOutcome::Removed(_) => "removed",
        TaskOutcome::Edited(_) => "edited",
    }
}
