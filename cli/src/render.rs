//! Plain-text rendering of an [`App`] for the line-oriented front ends.

use rulegen::presentation::{error_block, SUBMIT_PENDING_LABEL};
use rulegen::{App, LifecycleState, ResultView, EXAMPLES};

/// The result area: failure block, pending marker, or the current view.
pub fn render_result(app: &App) -> String {
    match app.state() {
        LifecycleState::Pending => SUBMIT_PENDING_LABEL.to_string(),
        LifecycleState::Failed(message) => error_block(message),
        _ => render_view(&app.view()),
    }
}

pub fn render_view(view: &ResultView) -> String {
    match view {
        ResultView::Summary(summary) => summary.to_text().trim_end().to_string(),
        ResultView::Raw(raw) => raw.clone(),
    }
}

/// One-line status: lifecycle, display mode and theme.
pub fn render_status(app: &App) -> String {
    format!(
        "[{}] view={} theme={}",
        app.state().label(),
        app.display_mode().label(),
        app.theme()
    )
}

pub fn render_inputs(app: &App) -> String {
    let mut out = format!("Prompt\n  {}\nContext docs\n", app.input.prompt());
    let docs = app.input.to_request_payload().context_docs;
    if docs.is_empty() {
        out.push_str("  (none)\n");
    }
    for doc in docs {
        out.push_str("  - ");
        out.push_str(&doc);
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn render_examples() -> String {
    EXAMPLES
        .iter()
        .enumerate()
        .map(|(i, example)| format!("{}. {}", i + 1, example))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulegen::presentation::EXPLANATION_PLACEHOLDER;
    use rulegen::{DisplayMode, GenerationResult, Settlement, Theme};
    use serde_json::json;

    fn resolved_app(body: serde_json::Value) -> App {
        let mut app = App::new(Theme::Dark);
        let dispatch = app.submit();
        app.apply_settlement(Settlement {
            ticket: dispatch.ticket,
            outcome: Ok(GenerationResult::from_value(body)),
        });
        app
    }

    #[test]
    fn idle_app_renders_placeholders() {
        let app = App::default();
        assert!(render_result(&app).contains(EXPLANATION_PLACEHOLDER));
        assert_eq!(render_status(&app), "[idle] view=Summary theme=dark");
    }

    #[test]
    fn pending_and_failed_states() {
        let mut app = App::default();
        let dispatch = app.submit();
        assert_eq!(render_result(&app), SUBMIT_PENDING_LABEL);

        app.apply_settlement(Settlement {
            ticket: dispatch.ticket,
            outcome: Err(rulegen::GenerateError::transport("connection refused")),
        });
        let rendered = render_result(&app);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, json!({ "message": "connection refused" }));
    }

    #[test]
    fn raw_mode_renders_body() {
        let mut app = resolved_app(json!({ "used_keys": ["a"] }));
        app.set_display_mode(DisplayMode::Raw);
        assert!(render_result(&app).contains("\"used_keys\""));
    }

    #[test]
    fn inputs_show_split_context() {
        let mut app = App::default();
        app.input.set_context("a\n\n  b  ");
        let text = render_inputs(&app);
        assert!(text.contains("  - a\n  - b"));
        app.input.set_context("");
        assert!(render_inputs(&app).ends_with("(none)"));
    }

    #[test]
    fn examples_are_numbered_from_one() {
        let text = render_examples();
        assert!(text.starts_with("1. Approve if bureau score > 700"));
        assert_eq!(text.lines().count(), 3);
    }
}
