//! Line REPL: edit the prompt and context with commands, submit, and print settlements as they
//! arrive while the user keeps typing.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use cli::render::{render_examples, render_inputs, render_result, render_status};
use cli::{parse_repl_line, ReplCommand, REPL_HELP};
use config::PrefsStore;
use rulegen::{
    save_theme, spawn_dispatch, App, Clipboard, Dispatch, RuleService, SettleOutcome,
    SystemClipboard,
};

const SUPERSEDED_NOTE: &str = "(a newer request replaces the one in flight)";

/// What the loop should do after a command.
#[derive(Debug)]
enum Step {
    Print(String),
    /// `note` is set when the dispatch supersedes a request still in flight.
    Dispatch {
        dispatch: Dispatch,
        note: Option<&'static str>,
    },
    Quit,
}

fn apply_command(
    app: &mut App,
    command: ReplCommand,
    clipboard: &mut dyn Clipboard,
    prefs: Option<&PrefsStore>,
) -> Step {
    match command {
        ReplCommand::Empty => Step::Print(String::new()),
        ReplCommand::SetPrompt(text) => {
            app.input.set_prompt(text);
            Step::Print("prompt set".into())
        }
        ReplCommand::AppendContext(line) => {
            let context = app.input.context_mut();
            if !context.is_empty() && !context.ends_with('\n') {
                context.push('\n');
            }
            context.push_str(&line);
            let count = app.input.to_request_payload().context_docs.len();
            Step::Print(format!("context: {} snippet(s)", count))
        }
        ReplCommand::ClearContext => {
            app.input.set_context("");
            Step::Print("context cleared".into())
        }
        ReplCommand::Example(index) => {
            app.apply_example(index);
            Step::Print(format!("prompt: {}", app.input.prompt()))
        }
        ReplCommand::Submit => {
            let note = app.is_pending().then_some(SUPERSEDED_NOTE);
            let dispatch = app.submit();
            Step::Dispatch { dispatch, note }
        }
        ReplCommand::Mode(mode) => {
            app.set_display_mode(mode);
            Step::Print(render_result(app))
        }
        ReplCommand::Copy => {
            let outcome = app.copy_logic_expression(clipboard);
            Step::Print(outcome.notice())
        }
        ReplCommand::ToggleTheme => {
            let theme = app.toggle_theme();
            if let Some(store) = prefs {
                if let Err(e) = save_theme(store, theme) {
                    tracing::warn!(error = %e, "theme preference not saved");
                    return Step::Print(format!("theme: {} (not saved: {})", theme, e));
                }
            }
            Step::Print(format!("theme: {}", theme))
        }
        ReplCommand::Show => Step::Print(format!(
            "{}\n{}\n{}",
            render_status(app),
            render_inputs(app),
            render_result(app)
        )),
        ReplCommand::Help => Step::Print(format!("{}\n\nExamples\n{}", REPL_HELP, render_examples())),
        ReplCommand::Quit => Step::Quit,
    }
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

/// Runs until EOF or `:quit`. A request still in flight at exit is abandoned.
pub async fn run_repl_loop(
    app: &mut App,
    service: Arc<dyn RuleService>,
    prefs: Option<PrefsStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut clipboard = SystemClipboard::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("rulegen REPL. :help for commands, :quit to leave.");
    println!("{}", render_inputs(app));
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let step = match parse_repl_line(&line) {
                    Ok(command) => apply_command(app, command, &mut clipboard, prefs.as_ref()),
                    Err(message) => Step::Print(message),
                };
                match step {
                    Step::Quit => break,
                    Step::Dispatch { dispatch, note } => {
                        if let Some(note) = note {
                            println!("{}", note);
                        }
                        println!("{}", app.submit_label());
                        spawn_dispatch(Arc::clone(&service), dispatch, tx.clone());
                    }
                    Step::Print(text) if text.is_empty() => {}
                    Step::Print(text) => println!("{}", text),
                }
                prompt()?;
            }
            Some(settlement) = rx.recv() => {
                if app.apply_settlement(settlement) == SettleOutcome::Applied {
                    println!();
                    println!("{}", render_result(app));
                    prompt()?;
                }
            }
        }
    }

    println!("Bye.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulegen::{ClipboardError, DisplayMode, GenerationResult, Settlement, Theme, EXAMPLES};
    use serde_json::json;

    #[derive(Default)]
    struct MemoryClipboard(Option<String>);

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.0 = Some(text.to_string());
            Ok(())
        }
    }

    fn run(app: &mut App, line: &str) -> Step {
        let mut clipboard = MemoryClipboard::default();
        apply_command(app, parse_repl_line(line).unwrap(), &mut clipboard, None)
    }

    #[test]
    fn context_lines_accumulate_and_clear() {
        let mut app = App::default();
        run(&mut app, ":ctx-clear");
        run(&mut app, ":ctx first");
        run(&mut app, ":ctx second");
        assert_eq!(
            app.input.to_request_payload().context_docs,
            vec!["first", "second"]
        );
        run(&mut app, ":ctx-clear");
        assert!(app.input.to_request_payload().context_docs.is_empty());
    }

    #[test]
    fn text_and_examples_set_prompt() {
        let mut app = App::default();
        run(&mut app, "Flag if overdue > 10");
        assert_eq!(app.input.prompt(), "Flag if overdue > 10");
        run(&mut app, ":example 3");
        assert_eq!(app.input.prompt(), EXAMPLES[2]);
    }

    #[test]
    fn submit_returns_dispatch_with_current_payload() {
        let mut app = App::default();
        run(&mut app, "rule text");
        let Step::Dispatch { dispatch, note } = run(&mut app, ":go") else {
            panic!("expected a dispatch");
        };
        assert_eq!(dispatch.request.prompt, "rule text");
        assert_eq!(note, None);
        assert!(app.is_pending());
    }

    #[test]
    fn resubmit_while_pending_carries_superseded_note() {
        let mut app = App::default();
        let Step::Dispatch { dispatch: first, .. } = run(&mut app, ":go") else {
            panic!("expected a dispatch");
        };
        let Step::Dispatch { dispatch: second, note } = run(&mut app, ":go") else {
            panic!("expected a dispatch");
        };
        assert!(second.ticket > first.ticket);
        assert_eq!(note, Some(SUPERSEDED_NOTE));
    }

    #[test]
    fn mode_switch_and_copy_after_settlement() {
        let mut app = App::default();
        let Step::Dispatch { dispatch, .. } = run(&mut app, ":submit") else {
            panic!("expected a dispatch");
        };
        app.apply_settlement(Settlement {
            ticket: dispatch.ticket,
            outcome: Ok(GenerationResult::from_value(json!({ "json_logic": { "var": "x" } }))),
        });

        let Step::Print(raw) = run(&mut app, ":raw") else {
            panic!("expected output");
        };
        assert_eq!(app.display_mode(), DisplayMode::Raw);
        assert!(raw.contains("\"json_logic\""));

        let Step::Print(notice) = run(&mut app, ":copy") else {
            panic!("expected output");
        };
        assert_eq!(notice, rulegen::presentation::COPIED_NOTICE);
    }

    #[test]
    fn theme_toggle_persists_when_store_given() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefsStore::at(dir.path().join("prefs.toml"));
        let mut app = App::new(Theme::Dark);
        let mut clipboard = MemoryClipboard::default();
        apply_command(&mut app, ReplCommand::ToggleTheme, &mut clipboard, Some(&store));
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(rulegen::load_theme(&store), Theme::Light);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut app = App::default();
        assert!(matches!(run(&mut app, ":quit"), Step::Quit));
    }
}
