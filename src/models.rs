use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type Timestamp = DateTime<Utc>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Personal,
    Work,
    School,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Work => "work",
            Category::School => "school",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "personal" => Ok(Category::Personal),
            "work" => Ok(Category::Work),
            "school" => Ok(Category::School),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextSize {
    Small,
    #[default]
    Normal,
    Large,
    Xlarge,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    En,
    Tl,
    Es,
    Ja,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub text_size: TextSize,
    pub language: Language,
    pub time_format: TimeFormat,
    pub audio_enabled: bool,
    pub voice_enabled: bool,
    pub focus_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            text_size: TextSize::Normal,
            language: Language::En,
            time_format: TimeFormat::TwelveHour,
            audio_enabled: true,
            voice_enabled: true,
            focus_mode: false,
        }
    }
}

impl Settings {
    /// Merges `patch` into `self`; fields the patch leaves unset keep their value.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(text_size) = patch.text_size {
            self.text_size = text_size;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(time_format) = patch.time_format {
            self.time_format = time_format;
        }
        if let Some(audio_enabled) = patch.audio_enabled {
            self.audio_enabled = audio_enabled;
        }
        if let Some(voice_enabled) = patch.voice_enabled {
            self.voice_enabled = voice_enabled;
        }
        if let Some(focus_mode) = patch.focus_mode {
            self.focus_mode = focus_mode;
        }
    }
}

/// Partial settings update. Unknown keys are ignored when deserializing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_size: Option<TextSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_mode: Option<bool>,
}

impl SettingsPatch {
    pub fn theme(theme: Theme) -> Self {
        Self {
            theme: Some(theme),
            ..Self::default()
        }
    }

    pub fn focus_mode(enabled: bool) -> Self {
        Self {
            focus_mode: Some(enabled),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "success" => Ok(NotificationKind::Success),
            "error" => Ok(NotificationKind::Error),
            "info" => Ok(NotificationKind::Info),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.text_size, TextSize::Normal);
        assert_eq!(settings.language, Language::En);
        assert_eq!(settings.time_format, TimeFormat::TwelveHour);
        assert!(settings.audio_enabled);
        assert!(settings.voice_enabled);
        assert!(!settings.focus_mode);
    }

    #[test]
    fn settings_serde_uses_camel_case_and_wire_values() {
        let mut settings = Settings::default();
        settings.text_size = TextSize::Xlarge;
        settings.time_format = TimeFormat::TwentyFourHour;
        let value = serde_json::to_value(&settings).expect("serialize settings");
        assert_eq!(
            value,
            serde_json::json!({
              "theme": "light",
              "textSize": "xlarge",
              "language": "en",
              "timeFormat": "24h",
              "audioEnabled": true,
              "voiceEnabled": true,
              "focusMode": false
            })
        );
    }

    #[test]
    fn apply_only_touches_fields_present_in_patch() {
        let mut settings = Settings::default();
        settings.apply(&SettingsPatch::theme(Theme::Dark));
        assert_eq!(
            settings,
            Settings {
                theme: Theme::Dark,
                ..Settings::default()
            }
        );

        settings.apply(&SettingsPatch::default());
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn settings_patch_ignores_unknown_keys() {
        let json = r#"{ "language": "ja", "fontFamily": "serif" }"#;
        let patch: SettingsPatch = serde_json::from_str(json).expect("patch should deserialize");
        assert_eq!(patch.language, Some(Language::Ja));
        assert_eq!(patch.theme, None);
    }

    #[test]
    fn task_due_date_is_optional_and_iso_formatted() {
        let json = r#"
        {
          "id": "1700000000000",
          "text": "buy milk",
          "completed": false,
          "priority": "high",
          "category": "work",
          "createdAt": "2024-01-02T03:04:05Z"
        }
        "#;

        let task: Task = serde_json::from_str(json).expect("task should deserialize");
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, Category::Work);

        let value = serde_json::to_value(&task).expect("serialize task");
        assert_eq!(value["createdAt"], "2024-01-02T03:04:05Z");
        assert!(value.get("dueDate").is_none());
    }

    #[test]
    fn notification_kind_parses_labels_case_insensitively() {
        assert_eq!("Success".parse(), Ok(NotificationKind::Success));
        assert_eq!(" error ".parse(), Ok(NotificationKind::Error));
        assert_eq!("info".parse(), Ok(NotificationKind::Info));
        assert!("warning".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn priority_and_category_parse_wire_names() {
        assert_eq!("HIGH".parse(), Ok(Priority::High));
        assert_eq!("school".parse(), Ok(Category::School));
        assert!("urgent".parse::<Priority>().is_err());
        assert!("".parse::<Category>().is_err());
    }
}
