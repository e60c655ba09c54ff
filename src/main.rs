//! yha-browse — browse YHA-Network source codes and blog posts in the
//! terminal, with favorites kept locally.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐  FetchMsg  ┌──────────┐  views   ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ─────────► │  app.rs  │ ───────► │ view.rs  │ ───────► │  ui.rs   │
//! │ (thread) │  (channel) │ (state)  │          │ (models) │          │ (render) │
//! └──────────┘            └──────────┘          └──────────┘          └──────────┘
//!                              ▲
//!                              │ Command
//!                         ┌──────────┐
//!                         │ input.rs │
//!                         └──────────┘
//! ```
//!
//! * **`source/`** — the `DataSource` trait, HTTP/file sources and the
//!   record types.
//! * **`fetch`** — one-shot background fetch per collection.
//! * **`cache`** — the per-session collection cache.
//! * **`filter`**, **`paginate`** — the category/search pipeline and paging.
//! * **`view`** — pure projection of state into cards and views.
//! * **`section`** — the section controller and its view state.
//! * **`store`** — favorites in the local preference store.
//! * **`app`** — command handlers over all of the above.
//! * **`ui`** — pure rendering of the view models.
//! * **`input`** — maps key events to commands.
//! * **`main`** — wires everything together: parse args, set up logging
//!   and the terminal, and run the event loop.

mod app;
mod cache;
mod config;
mod debounce;
mod error;
mod fetch;
mod filter;
mod input;
mod logging;
mod paginate;
mod section;
mod source;
mod store;
mod ui;
mod view;

use std::io;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::{AppConfig, Cli};
use fetch::Fetcher;
use section::Section;
use source::source_for;
use store::PreferenceStore;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    install_panic_hook();

    // -- arguments, logging, config ------------------------------------------
    let cli = Cli::parse();
    let (config, origin) = AppConfig::load(&cli);
    let _log_guard = logging::init(&config.data_dir());
    origin.log();

    // -- data sources and favorites ------------------------------------------
    let fetcher = Fetcher::new(
        source_for(&config.endpoints.source_codes, "source codes"),
        source_for(&config.endpoints.blog_posts, "blog posts"),
    );
    let store = PreferenceStore::open_or_memory(config.data_dir());

    let mut app = App::new(store, fetcher, config.ui.page_size, config.search_debounce());
    app.activate(Section::parse(&cli.section));

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut title = String::new();

    // -- main event loop -----------------------------------------------------
    // Each iteration:
    //   1. Apply finished fetches and a due search.
    //   2. Render the UI (and retitle the window on section change).
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = config.tick_rate();

    loop {
        // 1. Background events
        app.tick(Instant::now());

        // 2. Render
        if app.title() != title {
            title = app.title();
            execute!(io::stdout(), SetTitle(&title))?;
        }
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        // 3. Handle input
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
