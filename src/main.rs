use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use terminal_2048::config::AppConfig;
use terminal_2048::game::{GameSession, StdTiles};
use terminal_2048::logging;
use terminal_2048::store::JsonFileStore;
use terminal_2048::ui::App;

/// Play 2048 in the terminal.
#[derive(Parser)]
#[command(name = "terminal-2048", about = "Play 2048 in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "terminal-2048.toml")]
    config: PathBuf,

    /// Override the board size
    #[arg(long)]
    size: Option<usize>,

    /// Seed tile spawning for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Override where the high score is stored
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(size) = cli.size {
        config.game.size = size;
    }
    if let Some(seed) = cli.seed {
        config.game.seed = Some(seed);
    }
    if let Some(path) = cli.high_score_file {
        config.storage.high_score_path = path;
    }
    config.validate().context("invalid command-line overrides")?;

    logging::init(&config.logging.level, &config.logging.file).with_context(|| {
        format!("opening log file {}", config.logging.file.display())
    })?;
    info!(
        config = %cli.config.display(),
        found = cli.config.exists(),
        size = config.game.size,
        seed = ?config.game.seed,
        "starting"
    );

    let session = GameSession::with_key(
        config.game.size,
        StdTiles::from_seed_option(config.game.seed),
        JsonFileStore::new(&config.storage.high_score_path),
        config.storage.high_score_key.clone(),
    )
    .context("creating game session")?;

    run_tui(App::new(session)).context("terminal UI failed")?;
    Ok(())
}

fn run_tui(mut app: App<StdTiles, JsonFileStore>) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal — always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    info!(
        score = app.session().score(),
        high_score = app.session().high_score(),
        high_score_file = %app.session().store().path().display(),
        "exiting"
    );
    res
}
