//! Result presentation: a pure projection from [`LifecycleState`] and [`DisplayMode`] to
//! renderable content, plus copying the logic expression.
//!
//! Nothing here performs I/O except through the [`Clipboard`] passed to
//! [`copy_logic_expression`]. Front ends decide how the views are drawn.

use std::fmt;
use std::str::FromStr;

use serde_json::json;

use crate::clipboard::Clipboard;
use crate::orchestrator::LifecycleState;
use crate::protocol::KeyMapping;

pub const EXPLANATION_PLACEHOLDER: &str =
    "Run a prompt to see a natural-language explanation of the generated JSON Logic rule.";
pub const USED_KEYS_PLACEHOLDER: &str =
    "When a rule is generated, the referenced fields appear here.";
pub const KEY_MAPPINGS_PLACEHOLDER: &str =
    "Embedding-based phrase → field mappings will show up here when you generate a rule.";
pub const POLICY_SNIPPETS_PLACEHOLDER: &str =
    "Retrieved policy context used to steer the model will be displayed here.";
pub const RAW_PLACEHOLDER: &str = "// Generate a rule to inspect the full response payload.";

pub const SUBMIT_LABEL: &str = "Generate JSON Logic";
pub const SUBMIT_PENDING_LABEL: &str = "Generating rule...";

pub const COPIED_NOTICE: &str = "JSON Logic copied to clipboard";
pub const COPY_FAILED_NOTICE: &str = "Copy failed";
pub const NOTHING_TO_COPY_NOTICE: &str = "Nothing to copy yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Summary,
    Raw,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Summary => DisplayMode::Raw,
            DisplayMode::Raw => DisplayMode::Summary,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Summary => "Summary",
            DisplayMode::Raw => "Raw JSON",
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(DisplayMode::Summary),
            "raw" | "json" => Ok(DisplayMode::Raw),
            other => Err(format!("unknown display mode: {}", other)),
        }
    }
}

/// A list section that is either populated or replaced by its placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Items(Vec<T>),
    Placeholder(&'static str),
}

impl<T> Section<T> {
    fn from_list(items: Option<&[T]>, placeholder: &'static str) -> Self
    where
        T: Clone,
    {
        match items {
            Some(items) if !items.is_empty() => Section::Items(items.to_vec()),
            _ => Section::Placeholder(placeholder),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Section::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMappingRow {
    pub user_phrase: String,
    pub mapped_to: String,
    /// Fixed three decimals, or `-` when the service sent no score.
    pub similarity: String,
}

impl From<&KeyMapping> for KeyMappingRow {
    fn from(km: &KeyMapping) -> Self {
        Self {
            user_phrase: km.user_phrase.clone(),
            mapped_to: km.mapped_to.clone(),
            similarity: km
                .similarity
                .map(format_similarity)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

impl fmt::Display for KeyMappingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}  {}", self.user_phrase, self.mapped_to, self.similarity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub explanation: Section<String>,
    pub used_keys: Section<String>,
    pub key_mappings: Section<KeyMappingRow>,
    pub policy_snippets: Section<String>,
}

impl SummaryView {
    pub fn all_placeholders(&self) -> bool {
        self.explanation.is_placeholder()
            && self.used_keys.is_placeholder()
            && self.key_mappings.is_placeholder()
            && self.policy_snippets.is_placeholder()
    }

    /// Plain-text rendering used by the line-oriented front ends.
    pub fn to_text(&self) -> String {
        fn push_section<T: fmt::Display>(out: &mut String, title: &str, section: &Section<T>) {
            out.push_str(title);
            out.push('\n');
            match section {
                Section::Items(items) => {
                    for item in items {
                        out.push_str("  ");
                        out.push_str(&item.to_string());
                        out.push('\n');
                    }
                }
                Section::Placeholder(text) => {
                    out.push_str("  ");
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }

        let mut out = String::new();
        push_section(&mut out, "Explanation", &self.explanation);
        push_section(&mut out, "Used keys", &self.used_keys);
        push_section(&mut out, "Key mappings (embeddings)", &self.key_mappings);
        push_section(&mut out, "Policy snippets (RAG)", &self.policy_snippets);
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Summary(SummaryView),
    Raw(String),
}

pub fn format_similarity(similarity: f64) -> String {
    format!("{:.3}", similarity)
}

/// Summary projection. Anything other than `Resolved` shows every placeholder.
pub fn summary_view(state: &LifecycleState) -> SummaryView {
    let result = state.result();
    let explanation = match result.and_then(|r| r.explanation.as_deref()) {
        Some(text) if !text.is_empty() => Section::Items(vec![text.to_string()]),
        _ => Section::Placeholder(EXPLANATION_PLACEHOLDER),
    };
    let key_mappings = match result.and_then(|r| r.key_mappings.as_deref()) {
        Some(rows) if !rows.is_empty() => {
            Section::Items(rows.iter().map(KeyMappingRow::from).collect())
        }
        _ => Section::Placeholder(KEY_MAPPINGS_PLACEHOLDER),
    };
    SummaryView {
        explanation,
        used_keys: Section::from_list(
            result.and_then(|r| r.used_keys.as_deref()),
            USED_KEYS_PLACEHOLDER,
        ),
        key_mappings,
        policy_snippets: Section::from_list(
            result.and_then(|r| r.retrieved_policy_snippets.as_deref()),
            POLICY_SNIPPETS_PLACEHOLDER,
        ),
    }
}

/// The verbatim response body, pretty-printed, or [`RAW_PLACEHOLDER`]. A `null` body counts as
/// no result.
pub fn raw_view(state: &LifecycleState) -> String {
    state
        .result()
        .filter(|r| !r.raw().is_null())
        .and_then(|r| serde_json::to_string_pretty(r.raw()).ok())
        .unwrap_or_else(|| RAW_PLACEHOLDER.to_string())
}

pub fn project(state: &LifecycleState, mode: DisplayMode) -> ResultView {
    match mode {
        DisplayMode::Summary => ResultView::Summary(summary_view(state)),
        DisplayMode::Raw => ResultView::Raw(raw_view(state)),
    }
}

/// Failure message as pretty JSON: `{"message": "..."}`.
pub fn error_block(message: &str) -> String {
    serde_json::to_string_pretty(&json!({ "message": message }))
        .unwrap_or_else(|_| message.to_string())
}

pub fn submit_label(state: &LifecycleState) -> &'static str {
    if state.is_pending() {
        SUBMIT_PENDING_LABEL
    } else {
        SUBMIT_LABEL
    }
}

/// Pretty-printed logic expression when the state is `Resolved` and carries one.
pub fn logic_expression_text(state: &LifecycleState) -> Option<String> {
    let logic = state.result()?.json_logic.as_ref()?;
    serde_json::to_string_pretty(logic).ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    NothingToCopy,
    Failed(String),
}

impl CopyOutcome {
    pub fn notice(&self) -> String {
        match self {
            CopyOutcome::Copied => COPIED_NOTICE.to_string(),
            CopyOutcome::NothingToCopy => NOTHING_TO_COPY_NOTICE.to_string(),
            CopyOutcome::Failed(reason) => format!("{}: {}", COPY_FAILED_NOTICE, reason),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CopyOutcome::Failed(_))
    }
}

/// Copies the logic expression. Leaves the clipboard untouched when there is nothing to copy.
pub fn copy_logic_expression(state: &LifecycleState, clipboard: &mut dyn Clipboard) -> CopyOutcome {
    let Some(text) = logic_expression_text(state) else {
        return CopyOutcome::NothingToCopy;
    };
    match clipboard.set_text(&text) {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => {
            tracing::warn!(error = %e, "copy to clipboard failed");
            CopyOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::protocol::GenerationResult;
    use serde_json::{json, Value};

    #[derive(Default)]
    struct MemoryClipboard {
        text: Option<String>,
        fail: bool,
    }

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("no display".to_string()));
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    fn resolved(body: Value) -> LifecycleState {
        LifecycleState::Resolved(GenerationResult::from_value(body))
    }

    #[test]
    fn empty_result_shows_every_placeholder_and_raw_braces() {
        let state = resolved(json!({}));
        let summary = summary_view(&state);
        assert!(summary.all_placeholders());
        assert_eq!(summary.explanation, Section::Placeholder(EXPLANATION_PLACEHOLDER));
        assert_eq!(summary.used_keys, Section::Placeholder(USED_KEYS_PLACEHOLDER));
        assert_eq!(summary.key_mappings, Section::Placeholder(KEY_MAPPINGS_PLACEHOLDER));
        assert_eq!(
            summary.policy_snippets,
            Section::Placeholder(POLICY_SNIPPETS_PLACEHOLDER)
        );
        assert_eq!(raw_view(&state), "{}");
    }

    #[test]
    fn non_resolved_states_show_placeholders() {
        for state in [
            LifecycleState::Idle,
            LifecycleState::Pending,
            LifecycleState::Failed("boom".to_string()),
        ] {
            assert!(summary_view(&state).all_placeholders());
            assert_eq!(raw_view(&state), RAW_PLACEHOLDER);
        }
    }

    #[test]
    fn empty_strings_and_lists_fall_back() {
        let state = resolved(json!({
            "explanation": "",
            "used_keys": [],
            "key_mappings": [],
            "retrieved_policy_snippets": []
        }));
        assert!(summary_view(&state).all_placeholders());
    }

    #[test]
    fn populated_result_renders_rows() {
        let state = resolved(json!({
            "explanation": "Approve strong files.",
            "used_keys": ["bureau.score"],
            "key_mappings": [
                { "user_phrase": "bureau score", "mapped_to": "bureau.score", "similarity": 0.9 },
                { "user_phrase": "age", "mapped_to": "applicant.age", "similarity": 0.87654 }
            ],
            "retrieved_policy_snippets": ["minimum bureau score 600"]
        }));
        let summary = summary_view(&state);
        assert_eq!(
            summary.explanation,
            Section::Items(vec!["Approve strong files.".to_string()])
        );
        let Section::Items(rows) = &summary.key_mappings else {
            panic!("expected mapping rows");
        };
        assert_eq!(rows[0].similarity, "0.900");
        assert_eq!(rows[1].similarity, "0.877");
        assert_eq!(rows[0].to_string(), "bureau score → bureau.score  0.900");

        let text = summary.to_text();
        assert!(text.contains("Used keys\n  bureau.score\n"));
        assert!(text.contains("minimum bureau score 600"));
    }

    #[test]
    fn similarity_always_has_three_decimals() {
        assert_eq!(format_similarity(1.0), "1.000");
        assert_eq!(format_similarity(0.0), "0.000");
        assert_eq!(format_similarity(0.12345), "0.123");
    }

    #[test]
    fn raw_view_is_verbatim_body() {
        let body = json!({ "explanation": "x", "extra_field": { "kept": true } });
        let raw = raw_view(&resolved(body.clone()));
        let reparsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(reparsed, body);
        assert!(raw.contains("\n  \"extra_field\""));
    }

    #[test]
    fn raw_view_keeps_key_order_of_body() {
        let body: Value =
            serde_json::from_str(r#"{"json_logic":{"var":"a"},"explanation":"x"}"#).unwrap();
        let raw = raw_view(&resolved(body));
        let logic_at = raw.find("\"json_logic\"").unwrap();
        let explanation_at = raw.find("\"explanation\"").unwrap();
        assert!(logic_at < explanation_at);
    }

    #[test]
    fn null_body_reads_as_no_result() {
        let state = resolved(Value::Null);
        assert!(summary_view(&state).all_placeholders());
        assert_eq!(raw_view(&state), RAW_PLACEHOLDER);
        assert!(logic_expression_text(&state).is_none());
    }

    #[test]
    fn project_follows_mode_without_touching_state() {
        let state = resolved(json!({ "explanation": "x" }));
        let before = state.clone();
        assert!(matches!(project(&state, DisplayMode::Summary), ResultView::Summary(_)));
        assert!(matches!(project(&state, DisplayMode::Raw), ResultView::Raw(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn display_mode_toggles_and_parses() {
        assert_eq!(DisplayMode::default(), DisplayMode::Summary);
        assert_eq!(DisplayMode::Summary.toggled(), DisplayMode::Raw);
        assert_eq!(DisplayMode::Raw.toggled(), DisplayMode::Summary);
        assert_eq!("RAW".parse::<DisplayMode>(), Ok(DisplayMode::Raw));
        assert!("table".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn error_block_wraps_message() {
        let block = error_block("bureau score field missing");
        assert_eq!(
            serde_json::from_str::<Value>(&block).unwrap(),
            json!({ "message": "bureau score field missing" })
        );
    }

    #[test]
    fn submit_label_tracks_pending() {
        assert_eq!(submit_label(&LifecycleState::Pending), SUBMIT_PENDING_LABEL);
        assert_eq!(submit_label(&LifecycleState::Idle), SUBMIT_LABEL);
    }

    #[test]
    fn copied_logic_parses_back_to_same_value() {
        let logic = json!({ "and": [
            { ">": [{ "var": "bureau.score" }, 700] },
            { "<=": [25, { "var": "applicant.age" }, 60] }
        ]});
        let state = resolved(json!({ "json_logic": logic.clone() }));
        let mut cb = MemoryClipboard::default();

        assert_eq!(copy_logic_expression(&state, &mut cb), CopyOutcome::Copied);
        let copied = cb.text.unwrap();
        assert!(copied.contains('\n'));
        assert_eq!(serde_json::from_str::<Value>(&copied).unwrap(), logic);
    }

    #[test]
    fn nothing_to_copy_leaves_clipboard_untouched() {
        let mut cb = MemoryClipboard::default();
        assert_eq!(
            copy_logic_expression(&resolved(json!({})), &mut cb),
            CopyOutcome::NothingToCopy
        );
        assert_eq!(
            copy_logic_expression(&LifecycleState::Pending, &mut cb),
            CopyOutcome::NothingToCopy
        );
        assert!(cb.text.is_none());
    }

    #[test]
    fn clipboard_failure_is_reported() {
        let state = resolved(json!({ "json_logic": { "==": [1, 1] } }));
        let mut cb = MemoryClipboard {
            fail: true,
            ..Default::default()
        };
        let outcome = copy_logic_expression(&state, &mut cb);
        assert!(outcome.is_failure());
        assert!(outcome.notice().starts_with("Copy failed"));
    }
}
