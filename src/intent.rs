/// A structured command recognized from a voice utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Payload is the text after the first `:`, trimmed. It may be empty.
    AddTask(String),
    ToggleFocusMode,
    ReadTasks,
    Unrecognized,
}

const ADD_PREFIXES: [&str; 2] = ["add task", "create task"];

/// First-match dispatch over a final transcript, case-insensitively.
pub fn interpret(utterance: &str) -> Intent {
    let utterance = utterance.trim_start();
    let lower = utterance.to_lowercase();

    if ADD_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        let payload = utterance
            .split_once(':')
            .map(|(_, rest)| rest.trim())
            .unwrap_or_default();
        return Intent::AddTask(payload.to_string());
    }
    if lower.contains("focus mode") {
        return Intent::ToggleFocusMode;
    }
    if lower.contains("read tasks") {
        return Intent::ReadTasks;
    }
    Intent::Unrecognized
}
