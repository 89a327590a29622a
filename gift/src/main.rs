//! A digital gift in the terminal.
//!
//! Eight screens behind an accept prompt: a song, an "I LOVE YOU" animation,
//! a heart wall that records itself into the photo booth, and a love message
//! page. Saved pictures and messages persist in the data directory.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! printf '#go present-selection\n#go letter\n#play\n' | cargo run -p gift -- --headless
//! ```

mod app;
mod capture_worker;
mod content;
mod effects;
mod events;
mod headless;
mod scenes;
mod ui;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gift_core::{GiftSession, PngRasterizer, SessionConfig, Viewport};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use app::App;
use capture_worker::{CaptureTarget, CaptureWorker};
use events::{handle_event, EventResult};
use ui::render::render;
use ui::snapshot::snapshot_buffer;

#[derive(Parser, Debug)]
#[command(name = "gift", version, about = "A digital gift for someone special")]
struct Args {
    /// Run the line-oriented headless interface instead of the TUI.
    #[arg(long)]
    headless: bool,

    /// Directory holding saved items and photo memories.
    #[arg(long, env = "GIFT_DATA_DIR", default_value = ".gift-data")]
    data_dir: PathBuf,

    /// Where exported pictures are written. Defaults to `<data-dir>/pictures`.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Log file. Defaults to `<data-dir>/gift.log`.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Log to a file, since the terminal belongs to the UI. The filter comes
/// from `GIFT_LOG`, then `RUST_LOG`, then `info`.
fn init_logging(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::options().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_env("GIFT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| args.data_dir.join("gift.log"));
    if let Err(e) = init_logging(&log_file) {
        eprintln!("Warning: could not open log file {}: {e}", log_file.display());
    }

    let config = SessionConfig::new(&args.data_dir);

    if args.headless {
        return headless::run_headless(config).map_err(|e| e.into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let config = config.with_viewport(Viewport::new(size.width as u32 * 8, size.height as u32 * 16));
    let session = GiftSession::open(config);
    let capture = CaptureWorker::spawn(Arc::new(PngRasterizer::default()));
    let export_dir = args
        .export_dir
        .unwrap_or_else(|| args.data_dir.join("pictures"));

    // Run app
    let result = run_app(&mut terminal, App::new(session, capture, export_dir)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        tracing::error!("terminal error: {e}");
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Render
        let completed = terminal.draw(|f| render(f, &app))?;

        // Snapshot the frame that was just drawn for a requested screenshot
        if let Some(page) = app.take_pending_screenshot() {
            let snapshot = snapshot_buffer(completed.buffer, completed.area, &app.theme);
            app.submit_capture(CaptureTarget::Screenshot { page }, snapshot);
        }

        app.drain_captures();

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(50))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;

        // Let the capture worker make progress
        tokio::task::yield_now().await;

        if app.should_quit {
            return Ok(());
        }
    }
}
