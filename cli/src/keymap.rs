//! TUI key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which editor receives typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Prompt,
    Context,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Prompt => Focus::Context,
            Focus::Context => Focus::Prompt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit,
    /// 0-based example index.
    Example(usize),
    NextFocus,
    ToggleDisplayMode,
    Copy,
    ToggleTheme,
    Insert(char),
    Newline,
    Backspace,
    ClearField,
    Ignore,
}

pub fn action_for_key(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::F(5) => Action::Submit,
        KeyCode::F(n @ 1..=3) => Action::Example(usize::from(n - 1)),
        KeyCode::Tab | KeyCode::BackTab => Action::NextFocus,
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'c' | 'q' => Action::Quit,
            's' => Action::Submit,
            'r' => Action::ToggleDisplayMode,
            'y' => Action::Copy,
            't' => Action::ToggleTheme,
            'u' => Action::ClearField,
            _ => Action::Ignore,
        },
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Enter => Action::Newline,
        KeyCode::Backspace => Action::Backspace,
        _ => Action::Ignore,
    }
}
