use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Escape,
    Delete,
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
    /// Keyboard focus is inside a text field; global shortcuts stand down.
    pub in_text_input: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
            in_text_input: false,
        }
    }
}

/// Accepts forms such as `ctrl+n`, `cmd+,`, `shift+?`, `space`, `arrowleft`.
impl FromStr for KeyPress {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() {
            return Err("empty key".to_string());
        }
        let mut modifiers = Modifiers::default();
        let mut parts: Vec<&str> = value.split('+').collect();
        // `ctrl++` style input leaves an empty tail for the `+` key itself.
        let key_name = match parts.pop() {
            Some("") if value.ends_with("++") => "+",
            Some(name) => name,
            None => return Err("empty key".to_string()),
        };
        for part in parts.iter().filter(|part| !part.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "cmd" | "meta" | "command" => modifiers.meta = true,
                "shift" => modifiers.shift = true,
                other => return Err(format!("unknown modifier: {other}")),
            }
        }
        let key = match key_name.to_lowercase().as_str() {
            "space" | " " => Key::Space,
            "enter" | "return" => Key::Enter,
            "esc" | "escape" => Key::Escape,
            "delete" | "del" => Key::Delete,
            "backspace" => Key::Backspace,
            "up" | "arrowup" => Key::ArrowUp,
            "down" | "arrowdown" => Key::ArrowDown,
            "left" | "arrowleft" => Key::ArrowLeft,
            "right" | "arrowright" => Key::ArrowRight,
            _ => {
                let mut chars = key_name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Char(ch),
                    _ => return Err(format!("unknown key: {key_name}")),
                }
            }
        };
        Ok(Self {
            key,
            modifiers,
            in_text_input: false,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    FocusAddTaskInput,
    ToggleFocusMode,
    ToggleSettingsPanel,
    ToggleTheme,
    Escape,
    ShowHelp,
    CompleteFocused,
    RemoveFocused,
    FocusPrevious,
    FocusNext,
    ExitFocus,
}

/// Shortcuts that only exist while focus mode is engaged.
pub fn focus_action(press: &KeyPress) -> Option<KeyAction> {
    match press.key {
        Key::Space | Key::Enter => Some(KeyAction::CompleteFocused),
        Key::Delete | Key::Backspace => Some(KeyAction::RemoveFocused),
        Key::ArrowLeft | Key::ArrowUp => Some(KeyAction::FocusPrevious),
        Key::ArrowRight | Key::ArrowDown => Some(KeyAction::FocusNext),
        Key::Escape => Some(KeyAction::ExitFocus),
        Key::Char(_) => None,
    }
}

pub fn global_action(press: &KeyPress) -> Option<KeyAction> {
    if press.in_text_input {
        return None;
    }
    let command = press.modifiers.command();
    match press.key {
        Key::Char('n' | 'N') if command => Some(KeyAction::FocusAddTaskInput),
        Key::Char('f' | 'F') if command => Some(KeyAction::ToggleFocusMode),
        Key::Char(',') if command => Some(KeyAction::ToggleSettingsPanel),
        Key::Char('d' | 'D') if command => Some(KeyAction::ToggleTheme),
        Key::Char('?') if press.modifiers.shift => Some(KeyAction::ShowHelp),
        Key::Escape => Some(KeyAction::Escape),
        _ => None,
    }
}

/// Focus-local keys win while focus mode is engaged; other global shortcuts stay live.
pub fn resolve(press: &KeyPress, focus_active: bool) -> Option<KeyAction> {
    if focus_active {
        if let Some(action) = focus_action(press) {
            return Some(action);
        }
    }
    global_action(press)
}
