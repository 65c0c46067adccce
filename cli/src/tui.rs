//! Full-screen terminal UI.
//!
//! Layout: inputs on the left (prompt, context, submit line), model insight on the right
//! (summary or raw body), a status footer for notices and key hints. Requests run on the tokio
//! runtime; their settlements are drained from a channel on every tick.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use unicode_width::UnicodeWidthStr;

use cli::{action_for_key, Action, Focus};
use config::PrefsStore;
use rulegen::presentation::error_block;
use rulegen::{
    save_theme, spawn_dispatch, App, Clipboard, Dispatch, DisplayMode, NoticeKind, ResultView,
    RuleService, Section, SummaryView, SystemClipboard, Theme,
};

const TICK: Duration = Duration::from_millis(100);

struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    border: Color,
    error: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Green,
                border: Color::DarkGray,
                error: Color::LightRed,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                border: Color::Gray,
                error: Color::Red,
            },
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn block<'a>(&self, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
        let border = if focused { self.accent } else { self.border };
        let title: Line<'a> = title.into();
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(self.base())
    }
}

enum Flow {
    Continue,
    Dispatch(Dispatch),
    Quit,
}

/// Applies one key action to the app. Submission is ignored while a request is pending.
fn handle_action(
    app: &mut App,
    focus: &mut Focus,
    action: Action,
    clipboard: &mut dyn Clipboard,
    prefs: Option<&PrefsStore>,
) -> Flow {
    match action {
        Action::Quit => return Flow::Quit,
        Action::Submit if app.is_pending() => {}
        Action::Submit => return Flow::Dispatch(app.submit()),
        Action::Example(index) => {
            app.apply_example(index);
            *focus = Focus::Prompt;
        }
        Action::NextFocus => *focus = focus.next(),
        Action::ToggleDisplayMode => {
            app.toggle_display_mode();
        }
        Action::Copy => {
            app.copy_logic_expression(clipboard);
        }
        Action::ToggleTheme => {
            let theme = app.toggle_theme();
            if let Some(store) = prefs {
                if let Err(e) = save_theme(store, theme) {
                    tracing::warn!(error = %e, "theme preference not saved");
                    app.set_notice(format!("Theme not saved: {}", e), NoticeKind::Error);
                }
            }
        }
        Action::Insert(c) => field(app, *focus).push(c),
        Action::Newline => field(app, *focus).push('\n'),
        Action::Backspace => {
            field(app, *focus).pop();
        }
        Action::ClearField => field(app, *focus).clear(),
        Action::Ignore => {}
    }
    Flow::Continue
}

fn field(app: &mut App, focus: Focus) -> &mut String {
    match focus {
        Focus::Prompt => app.input.prompt_mut(),
        Focus::Context => app.input.context_mut(),
    }
}

/// Owns the terminal; restores it on drop.
struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    fn init() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
    }
}

/// Runs the TUI until the user quits. Blocks the calling thread; call from a blocking context.
pub fn run_tui(
    mut app: App,
    service: Arc<dyn RuleService>,
    prefs: Option<PrefsStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tui = Tui::init()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut clipboard = SystemClipboard::new();
    let mut focus = Focus::default();
    let mut dirty = true;

    loop {
        while let Ok(settlement) = rx.try_recv() {
            app.apply_settlement(settlement);
            dirty = true;
        }

        if dirty {
            tui.terminal.draw(|frame| draw(frame, &app, focus))?;
            dirty = false;
        }

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            dirty = true;
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match handle_action(
            &mut app,
            &mut focus,
            action_for_key(key),
            &mut clipboard,
            prefs.as_ref(),
        ) {
            Flow::Quit => break,
            Flow::Dispatch(dispatch) => {
                spawn_dispatch(Arc::clone(&service), dispatch, tx.clone());
            }
            Flow::Continue => {}
        }
        dirty = true;
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App, focus: Focus) {
    let palette = Palette::for_theme(app.theme());
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(2),
    ])
    .areas(frame.area());
    let [left, right] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
    let [prompt_area, context_area, submit_area] = Layout::vertical([
        Constraint::Percentage(50),
        Constraint::Min(4),
        Constraint::Length(1),
    ])
    .areas(left);

    let title = Line::from(vec![
        Span::styled(
            " JSON Logic Rule Generator ",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} · {} theme", app.state().label(), app.theme()),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(title).style(palette.base()), header);

    draw_editor(frame, &palette, prompt_area, "Prompt", app.input.prompt(), focus == Focus::Prompt);
    draw_editor(
        frame,
        &palette,
        context_area,
        "Context docs (one per line)",
        app.input.context(),
        focus == Focus::Context,
    );

    let submit_style = if app.is_pending() {
        Style::default().fg(palette.muted)
    } else {
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("[ {} ]", app.submit_label()), submit_style),
            Span::styled("  Ctrl+S / F5", Style::default().fg(palette.muted)),
        ])),
        submit_area,
    );

    draw_insight(frame, &palette, right, app);
    draw_footer(frame, &palette, footer, app);
}

fn draw_editor(
    frame: &mut Frame,
    palette: &Palette,
    area: Rect,
    title: &str,
    text: &str,
    focused: bool,
) {
    let title = if focused {
        format!(" {} * ", title)
    } else {
        format!(" {} ", title)
    };
    frame.render_widget(
        Paragraph::new(text.to_string()).block(palette.block(title, focused)),
        area,
    );
    if focused {
        let lines: Vec<&str> = text.split('\n').collect();
        let row = lines.len().saturating_sub(1) as u16;
        let col = lines.last().map(|l| l.width()).unwrap_or(0) as u16;
        let max_x = area.right().saturating_sub(2);
        let max_y = area.bottom().saturating_sub(2);
        frame.set_cursor_position((
            (area.x + 1 + col).min(max_x),
            (area.y + 1 + row).min(max_y),
        ));
    }
}

fn draw_insight(frame: &mut Frame, palette: &Palette, area: Rect, app: &App) {
    let tabs = Line::from(vec![
        Span::raw(" Model Insight  "),
        tab_span(palette, DisplayMode::Summary, app.display_mode()),
        Span::raw(" "),
        tab_span(palette, DisplayMode::Raw, app.display_mode()),
        Span::styled("  Ctrl+R ", Style::default().fg(palette.muted)),
    ]);

    let mut text = Text::default();
    if let Some(message) = app.state().error() {
        for line in error_block(message).lines() {
            text.push_line(Line::styled(line.to_string(), Style::default().fg(palette.error)));
        }
        text.push_line(Line::default());
    }
    match app.view() {
        ResultView::Summary(summary) => summary_lines(&mut text, palette, &summary),
        ResultView::Raw(raw) => {
            for line in raw.lines() {
                text.push_line(Line::raw(line.to_string()));
            }
        }
    }

    frame.render_widget(
        Paragraph::new(text)
            .block(palette.block(tabs, false))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn tab_span(palette: &Palette, mode: DisplayMode, active: DisplayMode) -> Span<'static> {
    let style = if mode == active {
        Style::default().fg(palette.bg).bg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    };
    Span::styled(format!(" {} ", mode.label()), style)
}

fn summary_lines(text: &mut Text<'static>, palette: &Palette, summary: &SummaryView) {
    let heading = Style::default().fg(palette.muted).add_modifier(Modifier::BOLD);
    let placeholder = Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC);

    fn push<T: ToString>(
        text: &mut Text<'static>,
        title: &'static str,
        section: &Section<T>,
        heading: Style,
        placeholder: Style,
    ) {
        text.push_line(Line::styled(title, heading));
        match section {
            Section::Items(items) => {
                for item in items {
                    text.push_line(Line::raw(format!("  {}", item.to_string())));
                }
            }
            Section::Placeholder(p) => text.push_line(Line::styled(format!("  {}", p), placeholder)),
        }
        text.push_line(Line::default());
    }

    push(text, "EXPLANATION", &summary.explanation, heading, placeholder);
    push(text, "USED KEYS", &summary.used_keys, heading, placeholder);
    push(text, "KEY MAPPINGS (EMBEDDINGS)", &summary.key_mappings, heading, placeholder);
    push(text, "POLICY SNIPPETS (RAG)", &summary.policy_snippets, heading, placeholder);
}

fn draw_footer(frame: &mut Frame, palette: &Palette, area: Rect, app: &App) {
    let notice = match app.notice() {
        Some(n) => {
            let color = match n.kind {
                NoticeKind::Info => palette.accent,
                NoticeKind::Error => palette.error,
            };
            Line::styled(n.text.clone(), Style::default().fg(color))
        }
        None => Line::default(),
    };
    let hints = Line::styled(
        "F1-F3 examples  Tab focus  Ctrl+S submit  Ctrl+R view  Ctrl+Y copy  Ctrl+T theme  Ctrl+U clear  Esc quit",
        Style::default().fg(palette.muted),
    );
    frame.render_widget(Paragraph::new(vec![notice, hints]).style(palette.base()), area);
}
