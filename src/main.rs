use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use futures::StreamExt;
use tracing::info;

use burrow::editor::Position;
use burrow::input::KeySpec;
use burrow::plugins::shared;
use burrow::services::{BrowserContext, Level};
use burrow::{ConfigEngine, KeyOutcome, PluginHost, logging};

/// Plugin host for the burrow file manager
#[derive(Parser, Debug)]
#[command(name = "burrow", version, about)]
struct Args {
    /// File to open in the editor
    file: Option<PathBuf>,

    /// Extra plugin directory, loaded after the configured ones
    #[arg(long = "plugin-dir", value_name = "DIR")]
    plugin_dirs: Vec<PathBuf>,

    /// Config script to use instead of ~/.config/burrow/init.rhai
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replay a comma separated key list without a terminal
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    keys: Option<Vec<String>>,

    /// Print the buffer content after a replay
    #[arg(long, requires = "keys")]
    print: bool,

    /// Log file for interactive sessions
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.keys.is_some() {
        logging::init_stderr();
    } else {
        let log_path = args
            .log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("burrow").join("burrow.log")))
            .unwrap_or_else(|| std::env::temp_dir().join("burrow.log"));
        logging::init_file(&log_path)
            .with_context(|| format!("cannot open log file {}", log_path.display()))?;
    }

    let mut host = build_host(&args)?;

    if let Some(file) = &args.file {
        if !host.open_file(file) {
            bail!("cannot open {}", file.display());
        }
    }

    match &args.keys {
        Some(keys) => replay(&mut host, keys, args.print),
        None => run_interactive(&mut host).await,
    }
}

fn build_host(args: &Args) -> Result<PluginHost> {
    let mut config = ConfigEngine::new();
    match &args.config {
        Some(path) => config.load_file(path)?,
        None => config.load_default()?,
    }
    let mut settings = config.settings();
    settings.apply_env();
    settings.plugin_dirs.extend(args.plugin_dirs.iter().cloned());

    let mut host = PluginHost::new(settings);
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    host.set_browser_context(BrowserContext::new(cwd));

    let errors = host.load_configured();
    info!(
        loaded = host.plugin_names().len(),
        failed = errors.len(),
        "plugins loaded"
    );
    Ok(host)
}

/// Feed `keys` to the host without a terminal and report what happened
fn replay(host: &mut PluginHost, keys: &[String], print: bool) -> Result<()> {
    for raw in keys {
        let key: KeySpec = raw
            .parse()
            .with_context(|| format!("invalid key in --keys: {raw:?}"))?;
        match host.handle_key(key) {
            KeyOutcome::Consumed { plugin, handler } => {
                eprintln!("{key}: consumed by {plugin}::{handler}");
            }
            KeyOutcome::Default => eprintln!("{key}: default action"),
            KeyOutcome::Unhandled => eprintln!("{key}: unhandled"),
            KeyOutcome::Quit => {
                eprintln!("{key}: quit requested");
                break;
            }
        }
    }

    for message in host.take_messages() {
        let tag = match message.level {
            Level::Notify => "notify",
            Level::Status => "status",
            Level::Console => "console",
            Level::Error => "error",
        };
        eprintln!("[{tag}] {}", message.text);
    }

    if print {
        let editor = host.editor();
        if let Some(content) = shared::read(&editor).get_content() {
            print!("{content}");
            io::stdout().flush()?;
        }
    }
    Ok(())
}

async fn run_interactive(host: &mut PluginHost) -> Result<()> {
    setup_terminal()?;
    let result = event_loop(host).await;
    teardown_terminal()?;
    result
}

async fn event_loop(host: &mut PluginHost) -> Result<()> {
    let mut stdout = io::stdout();
    draw(&mut stdout, host)?;

    // Event stream for async key reading
    let mut event_stream = EventStream::new();

    while let Some(event) = event_stream.next().await {
        match event? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(spec) = KeySpec::from_event(&key) else {
                    continue;
                };
                let outcome = host.handle_key(spec);
                if outcome == KeyOutcome::Unhandled && spec == KeySpec::Ctrl('Q') {
                    break;
                }
                if outcome == KeyOutcome::Quit || host.quit_requested() {
                    break;
                }
            }
            Event::Resize(_, _) => {}
            _ => continue,
        }
        draw(&mut stdout, host)?;
    }
    Ok(())
}

fn setup_terminal() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)
}

fn teardown_terminal() -> io::Result<()> {
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}

/// Plain text view: a header, the visible buffer lines and the last message
fn draw(out: &mut impl Write, host: &PluginHost) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let body_rows = usize::from(height.saturating_sub(2));
    let clip = |s: &str| s.chars().take(usize::from(width)).collect::<String>();

    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let editor_handle = host.editor();
    let editor = shared::read(&editor_handle);
    let mut cursor_at = None;
    if let Some(cursor) = editor.cursor() {
        let title = editor
            .path()
            .map_or_else(|| "[scratch]".to_string(), |p| p.display().to_string());
        let flags = if editor.is_dirty() { " [+]" } else { "" };
        queue!(out, Print(clip(&format!("{title}{flags}"))))?;

        if let Some((top, cell)) = viewport(cursor, width, body_rows) {
            let lines = editor
                .get_lines(top as i64, (top + body_rows - 1).min(editor.line_count()) as i64)
                .unwrap_or_default();
            for (row, line) in lines.iter().enumerate() {
                queue!(out, MoveTo(0, row as u16 + 1), Print(clip(line)))?;
            }
            cursor_at = Some(cell);
        }
    } else {
        let context = host.browser_context();
        queue!(out, Print(clip(&context.cwd.display().to_string())))?;
    }
    drop(editor);

    let messages = host.messages();
    let footer = {
        let log = shared::read(&messages);
        log.entries()
            .last()
            .map(|m| m.text.clone())
            .or_else(|| log.status_line().map(str::to_string))
            .unwrap_or_default()
    };
    queue!(out, MoveTo(0, height.saturating_sub(1)), Print(clip(&footer)))?;

    if let Some((x, y)) = cursor_at {
        queue!(out, MoveTo(x, y))?;
    }
    out.flush()
}

/// First visible buffer line and the screen cell of the cursor, or `None`
/// when the terminal has no rows left for the buffer
fn viewport(cursor: Position, width: u16, body_rows: usize) -> Option<(usize, (u16, u16))> {
    if body_rows == 0 {
        return None;
    }
    let top = (cursor.line + 1).saturating_sub(body_rows).max(1);
    let x = (cursor.col - 1).min(usize::from(width.saturating_sub(1)));
    let y = cursor.line.saturating_sub(top) + 1;
    Some((top, (x as u16, y as u16)))
}
