//! rulegen CLI binary: generate JSON Logic rules from natural-language prompts.
//!
//! Subcommands: `tui` (default), `repl`, `generate` (one-shot), `examples`, `theme`.

mod log_format;
mod logging;
mod repl;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use cli::render::render_examples;
use cli::{run_generate, CliError, GenerateOptions};
use config::PrefsStore;
use rulegen::presentation::copy_logic_expression;
use rulegen::{
    load_theme, resolve_api_url, save_theme, App, CopyOutcome, HttpRuleService, RuleService,
    SystemClipboard, Theme, APP_NAME,
};

#[derive(Parser, Debug)]
#[command(name = "rulegen")]
#[command(about = "rulegen: turn natural-language rules into JSON Logic")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// Rule service base URL (default: RULEGEN_API_URL or https://json-logic-backend.onrender.com)
    #[arg(long, value_name = "URL", global = true)]
    url: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Full-screen terminal UI (default)
    Tui,
    /// Line-oriented REPL
    Repl,
    /// Generate one rule and print it
    Generate(GenerateArgs),
    /// List the example prompts
    Examples,
    /// Show or set the persisted theme
    Theme(ThemeArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct GenerateArgs {
    /// Prompt text (or pass as positional words)
    #[arg(short, long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Prompt words when -p/--prompt is not used
    #[arg(value_name = "PROMPT")]
    words: Vec<String>,

    /// Use example prompt N (see `rulegen examples`)
    #[arg(long, value_name = "N")]
    example: Option<usize>,

    /// Context snippet; repeat for several
    #[arg(long = "context", value_name = "LINE")]
    context: Vec<String>,

    /// Read context snippets from a file, one per line
    #[arg(long, value_name = "PATH")]
    context_file: Option<PathBuf>,

    /// Print the raw response body instead of the summary
    #[arg(long)]
    raw: bool,

    /// Print the response body as JSON (compact unless --pretty)
    #[arg(long)]
    json: bool,

    /// With --json, pretty-print
    #[arg(long)]
    pretty: bool,

    /// Copy the JSON Logic to the clipboard
    #[arg(long)]
    copy: bool,
}

impl GenerateArgs {
    fn into_options(self) -> GenerateOptions {
        let prompt = self
            .prompt
            .or_else(|| (!self.words.is_empty()).then(|| self.words.join(" ")));
        GenerateOptions {
            prompt,
            example: self.example,
            context: self.context,
            context_file: self.context_file,
            raw: self.raw,
            json: self.json,
            pretty: self.pretty,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
struct ThemeArgs {
    /// New theme; omit to print the current one
    #[arg(value_enum)]
    action: Option<ThemeAction>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ThemeAction {
    Dark,
    Light,
    Toggle,
}

fn open_prefs() -> Option<PrefsStore> {
    match PrefsStore::for_app(APP_NAME) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "no preference store; theme will not persist");
            None
        }
    }
}

fn run_theme(args: &ThemeArgs, prefs: Option<&PrefsStore>) -> Result<(), CliError> {
    let current = prefs.map(load_theme).unwrap_or_default();
    let next = match args.action {
        None => {
            println!("{}", current);
            return Ok(());
        }
        Some(ThemeAction::Dark) => Theme::Dark,
        Some(ThemeAction::Light) => Theme::Light,
        Some(ThemeAction::Toggle) => current.toggled(),
    };
    if let Some(store) = prefs {
        save_theme(store, next)?;
    }
    println!("{}", next);
    Ok(())
}

async fn run_one_shot(
    args: GenerateArgs,
    service: &dyn RuleService,
) -> Result<bool, Box<dyn std::error::Error>> {
    let copy = args.copy;
    let opts = args.into_options();
    let input = opts.build_input()?;
    let out = run_generate(service, &input, &opts).await?;

    if out.failed {
        eprintln!("{}", out.text);
        return Ok(false);
    }
    println!("{}", out.text);
    if copy {
        let mut clipboard = SystemClipboard::new();
        let outcome = copy_logic_expression(&out.state, &mut clipboard);
        eprintln!("{}", outcome.notice());
        if matches!(outcome, CopyOutcome::Failed(_)) {
            return Ok(false);
        }
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply(APP_NAME, None).ok();
    logging::init()?;

    let args = Args::parse();
    let base_url = resolve_api_url(args.url.as_deref());
    let service: Arc<dyn RuleService> = Arc::new(HttpRuleService::new(&base_url));
    let prefs = open_prefs();
    tracing::info!(url = %base_url, "rulegen starting");

    match args.cmd.unwrap_or(Command::Tui) {
        Command::Examples => println!("{}", render_examples()),
        Command::Theme(theme_args) => {
            if let Err(e) = run_theme(&theme_args, prefs.as_ref()) {
                eprintln!("rulegen: {}", e);
                std::process::exit(1);
            }
        }
        Command::Generate(gen_args) => match run_one_shot(gen_args, service.as_ref()).await {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(e) => {
                eprintln!("rulegen: {}", e);
                std::process::exit(1);
            }
        },
        Command::Repl => {
            let mut app = App::new(prefs.as_ref().map(load_theme).unwrap_or_default());
            repl::run_repl_loop(&mut app, service, prefs).await?;
        }
        Command::Tui => {
            let app = App::new(prefs.as_ref().map(load_theme).unwrap_or_default());
            tokio::task::block_in_place(|| tui::run_tui(app, service, prefs))?;
        }
    }
    Ok(())
}
