//! # Rulegen
//!
//! Client core for a service that turns a natural-language rule description into a
//! JSON Logic expression. The user edits a prompt plus optional context snippets, submits
//! them, and inspects the service response as a summary or as the verbatim body.
//!
//! ## Design principles
//!
//! - **One owner of state**: [`App`] holds the input, the request lifecycle, the display mode
//!   and the theme. Front ends forward actions and draw from [`App::view`].
//! - **Pure projection**: [`presentation`] maps a [`LifecycleState`] and [`DisplayMode`] to
//!   content without side effects.
//! - **Latest request wins**: every submission gets a [`RequestTicket`]; settlements for older
//!   tickets are dropped, and nothing stays [`LifecycleState::Pending`] after its request ends.
//!
//! ## Modules
//!
//! - [`input`]: prompt and context text, example prompts, request payload.
//! - [`protocol`]: wire types and lenient response parsing.
//! - [`client`]: the [`RuleService`] seam and [`HttpRuleService`].
//! - [`orchestrator`]: Idle / Pending / Resolved / Failed lifecycle.
//! - [`presentation`]: summary and raw views, placeholders, copy to clipboard.
//! - [`theme`]: dark / light theme persisted through [`env_config::PrefsStore`].

pub mod app;
pub mod client;
pub mod clipboard;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod presentation;
pub mod protocol;
pub mod theme;

pub use app::{App, Notice, NoticeKind};
pub use client::{
    generate_rule_endpoint, resolve_api_url, HttpRuleService, RuleService, API_URL_ENV,
    DEFAULT_API_URL,
};
pub use clipboard::{Clipboard, ClipboardError, SystemClipboard};
pub use error::GenerateError;
pub use input::{split_context_docs, InputModel, DEFAULT_CONTEXT, EXAMPLES};
pub use orchestrator::{
    execute, spawn_dispatch, Dispatch, LifecycleState, RequestOrchestrator, RequestTicket,
    SettleOutcome, Settlement,
};
pub use presentation::{
    copy_logic_expression, error_block, project, raw_view, summary_view, CopyOutcome,
    DisplayMode, KeyMappingRow, ResultView, Section, SummaryView,
};
pub use protocol::{GenerationResult, KeyMapping, RuleRequest};
pub use theme::{load_theme, save_theme, Theme};

/// Application name used for the XDG config directory and preference file.
pub const APP_NAME: &str = "rulegen";
