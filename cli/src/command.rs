//! REPL line grammar.
//!
//! A line that does not start with `:` replaces the prompt. Everything else is a command.

use rulegen::DisplayMode;

use crate::example_index;

pub const REPL_HELP: &str = "\
Type a rule description to set the prompt. Commands:
  :ctx <line>     append a context snippet
  :ctx-clear      clear the context
  :example N      use example prompt N (1-3)
  :submit, :go    generate the rule
  :summary, :raw  switch the result view
  :copy           copy the JSON Logic to the clipboard
  :theme          toggle dark/light theme
  :show           print prompt, context and the current result
  :help           this text
  :quit           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Blank line; nothing to do.
    Empty,
    SetPrompt(String),
    AppendContext(String),
    ClearContext,
    /// 0-based example index.
    Example(usize),
    Submit,
    Mode(DisplayMode),
    Copy,
    ToggleTheme,
    Show,
    Help,
    Quit,
}

fn is_quit_word(s: &str) -> bool {
    matches!(s, "quit" | "exit" | "q")
}

/// Parses one input line. The error is a message for the user.
pub fn parse_repl_line(line: &str) -> Result<ReplCommand, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ReplCommand::Empty);
    }
    let Some(command) = trimmed.strip_prefix(':') else {
        if is_quit_word(&trimmed.to_lowercase()) || trimmed == "/quit" {
            return Ok(ReplCommand::Quit);
        }
        return Ok(ReplCommand::SetPrompt(trimmed.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match name.to_lowercase().as_str() {
        "ctx" if arg.is_empty() => Err(":ctx needs a snippet, e.g. :ctx Credit Policy v1.0".into()),
        "ctx" => Ok(ReplCommand::AppendContext(arg.to_string())),
        "ctx-clear" => Ok(ReplCommand::ClearContext),
        "example" | "ex" => {
            let number: usize = arg
                .parse()
                .map_err(|_| format!("expected an example number, got {:?}", arg))?;
            example_index(number)
                .map(ReplCommand::Example)
                .map_err(|e| e.to_string())
        }
        "submit" | "go" => Ok(ReplCommand::Submit),
        "summary" => Ok(ReplCommand::Mode(DisplayMode::Summary)),
        "raw" => Ok(ReplCommand::Mode(DisplayMode::Raw)),
        "copy" => Ok(ReplCommand::Copy),
        "theme" => Ok(ReplCommand::ToggleTheme),
        "show" => Ok(ReplCommand::Show),
        "help" | "h" | "?" => Ok(ReplCommand::Help),
        other if is_quit_word(other) => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command :{} (try :help)", other)),
    }
}
