pub mod capability;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod feedback;
pub mod focus;
pub mod i18n;
pub mod intent;
pub mod keys;
pub mod logging;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod settings;
pub mod storage;
pub mod tasks;

pub use commands::{App, Capabilities};
pub use events::{AppEvent, AppSnapshot, UiEvent};
pub use models::{Category, Notification, NotificationKind, Priority, Settings, SettingsPatch, Task};
