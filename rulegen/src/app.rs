//! Front-end controller: the single owner of input, lifecycle, display mode and theme.
//!
//! Front ends hold one [`App`], forward user actions to it, and draw from [`App::view`]. The
//! request itself runs outside (see [`crate::orchestrator::spawn_dispatch`]) and comes back
//! through [`App::apply_settlement`].

use crate::clipboard::Clipboard;
use crate::input::InputModel;
use crate::orchestrator::{Dispatch, LifecycleState, RequestOrchestrator, SettleOutcome, Settlement};
use crate::presentation::{self, CopyOutcome, DisplayMode, ResultView};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Short-lived status line shown after a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Default)]
pub struct App {
    pub input: InputModel,
    orchestrator: RequestOrchestrator,
    display_mode: DisplayMode,
    theme: Theme,
    notice: Option<Notice>,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &LifecycleState {
        self.orchestrator.state()
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.toggled();
        self.display_mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and returns the new one; persisting it is the caller's job.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, text: impl Into<String>, kind: NoticeKind) {
        self.notice = Some(Notice {
            text: text.into(),
            kind,
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn apply_example(&mut self, index: usize) -> bool {
        self.input.apply_example(index)
    }

    /// Enters `Pending` and returns the dispatch to execute.
    pub fn submit(&mut self) -> Dispatch {
        self.notice = None;
        self.orchestrator.submit(&self.input)
    }

    pub fn apply_settlement(&mut self, settlement: Settlement) -> SettleOutcome {
        self.orchestrator.settle(settlement)
    }

    pub fn view(&self) -> ResultView {
        presentation::project(self.state(), self.display_mode)
    }

    pub fn submit_label(&self) -> &'static str {
        presentation::submit_label(self.state())
    }

    /// Copies the logic expression and records the outcome as the current notice.
    pub fn copy_logic_expression(&mut self, clipboard: &mut dyn Clipboard) -> CopyOutcome {
        let outcome = presentation::copy_logic_expression(self.state(), clipboard);
        let kind = if outcome.is_failure() {
            NoticeKind::Error
        } else {
            NoticeKind::Info
        };
        self.set_notice(outcome.notice(), kind);
        outcome
    }
}
