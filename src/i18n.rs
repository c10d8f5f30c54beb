use chrono::Locale;
use serde::Serialize;

use crate::models::Language;

/// User-facing strings for one language.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub title: &'static str,
    pub add_task: &'static str,
    pub task_placeholder: &'static str,
    pub add_button: &'static str,
    pub settings: &'static str,
    pub focus_mode: &'static str,
    pub voice_commands: &'static str,
    pub audio_feedback: &'static str,
    pub no_tasks: &'static str,
    pub completed: &'static str,
    pub pending: &'static str,
}

const EN: Translation = Translation {
    title: "DoaList - Accessible Tasks",
    add_task: "Add new task",
    task_placeholder: "What do you need to do?",
    add_button: "Add Task",
    settings: "Settings",
    focus_mode: "Focus Mode",
    voice_commands: "Voice Commands",
    audio_feedback: "Audio Feedback",
    no_tasks: "No tasks yet. Add one to get started!",
    completed: "completed",
    pending: "pending",
};

const TL: Translation = Translation {
    title: "DoaList - Mga Gawaing Accessible",
    add_task: "Magdagdag ng bagong gawain",
    task_placeholder: "Ano ang kailangan mong gawin?",
    add_button: "Magdagdag ng Gawain",
    settings: "Mga Setting",
    focus_mode: "Focus Mode",
    voice_commands: "Voice Commands",
    audio_feedback: "Audio Feedback",
    no_tasks: "Walang gawain pa. Magdagdag para magsimula!",
    completed: "tapos na",
    pending: "hindi pa tapos",
};

const ES: Translation = Translation {
    title: "DoaList - Tareas Accesibles",
    add_task: "Agregar nueva tarea",
    task_placeholder: "¿Qué necesitas hacer?",
    add_button: "Agregar Tarea",
    settings: "Configuración",
    focus_mode: "Modo Enfoque",
    voice_commands: "Comandos de Voz",
    audio_feedback: "Retroalimentación de Audio",
    no_tasks: "¡Aún no hay tareas. Agrega una para comenzar!",
    completed: "completado",
    pending: "pendiente",
};

const JA: Translation = Translation {
    title: "DoaList - アクセシブルなタスク",
    add_task: "新しいタスクを追加",
    task_placeholder: "何をする必要がありますか？",
    add_button: "タスクを追加",
    settings: "設定",
    focus_mode: "フォーカスモード",
    voice_commands: "音声コマンド",
    audio_feedback: "オーディオフィードバック",
    no_tasks: "まだタスクがありません。開始するには追加してください！",
    completed: "完了",
    pending: "保留中",
};

pub fn translation(language: Language) -> &'static Translation {
    match language {
        Language::En => &EN,
        Language::Tl => &TL,
        Language::Es => &ES,
        Language::Ja => &JA,
    }
}

/// Locale tag handed to the speech engines.
pub fn speech_code(language: Language) -> &'static str {
    match language {
        Language::En => "en-US",
        Language::Es => "es-ES",
        Language::Tl => "tl-PH",
        Language::Ja => "ja-JP",
    }
}

/// Locale for month names and AM/PM markers in formatted dates.
pub fn date_locale(language: Language) -> Locale {
    match language {
        Language::En => Locale::en_US,
        Language::Es => Locale::es_ES,
        Language::Tl => Locale::tl_PH,
        Language::Ja => Locale::ja_JP,
    }
}

pub const VOICE_HELP: &str = "Voice navigation is ready. Say 'add task colon' followed by your task, or say 'read tasks' to hear your current list.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_words_are_localized() {
        assert_eq!(translation(Language::En).completed, "completed");
        assert_eq!(translation(Language::Tl).pending, "hindi pa tapos");
        assert_eq!(translation(Language::Es).completed, "completado");
        assert_eq!(translation(Language::Ja).pending, "保留中");
    }

    #[test]
    fn speech_codes_cover_every_language() {
        assert_eq!(speech_code(Language::En), "en-US");
        assert_eq!(speech_code(Language::Es), "es-ES");
        assert_eq!(speech_code(Language::Tl), "tl-PH");
        assert_eq!(speech_code(Language::Ja), "ja-JP");
    }
}
