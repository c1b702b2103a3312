use anyhow::{Context, Result};
use clap::Args;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    layout::Rect,
};
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};
use url::Url;

use pageflow::config::Config;
use pageflow::nav::{FileStorage, MemoryStorage, Storage};
use pageflow::preview::{Preview, view};

#[derive(Args)]
pub struct PreviewCommands {
    /// Initial location (defaults to the configured base URL)
    #[arg(long)]
    pub url: Option<String>,
    /// Keep the selection in memory instead of the storage file
    #[arg(long)]
    pub ephemeral: bool,
}

pub async fn preview_command(args: PreviewCommands, config: &Config) -> Result<()> {
    let url = args.url.unwrap_or_else(|| config.preview.base_url.clone());
    Url::parse(&url).with_context(|| format!("Invalid URL: {}", url))?;

    let storage: Rc<dyn Storage> = if args.ephemeral {
        Rc::new(MemoryStorage::new())
    } else {
        let storage = FileStorage::open_default()?;
        info!("Persisting selection to {:?}", storage.path());
        Rc::new(storage)
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut preview = Preview::new(config, storage, &url);
    let result = run_preview(&mut terminal, &mut preview, config.timing.frame_interval()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn screen_area<B: Backend>(terminal: &Terminal<B>) -> Result<Rect> {
    let size = terminal.size()?;
    Ok(Rect::new(0, 0, size.width, size.height))
}

async fn run_preview<B: Backend>(
    terminal: &mut Terminal<B>,
    preview: &mut Preview,
    frame_interval: Duration,
) -> Result<()> {
    let started = Instant::now();
    preview.start(screen_area(terminal)?);

    loop {
        let frame_start = Instant::now();

        // Process all pending events first for minimal input latency
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) => {
                    if !preview.handle_key(key) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => preview.handle_mouse(mouse),
                _ => {}
            }
        }

        preview.tick(screen_area(terminal)?, started.elapsed());

        terminal.draw(|frame| view::render(frame, preview))?;

        // Sleep for the remainder of the frame
        if let Some(remaining) = frame_interval.checked_sub(frame_start.elapsed()) {
            tokio::time::sleep(remaining).await;
        }
    }
}
