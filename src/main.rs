use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

use tak::{
    app::{App, KeyOutcome},
    config::{Config, ConfigStore, FileConfigStore},
    corpus::store_for,
    logging,
    persist::{FileResultSink, ResultFormat},
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    AVAILABLE_TIMES,
};

/// timed word typing test for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test: pick a word list and a duration, type the paragraph word by word and get live wpm, accuracy and a saved per-word report."
)]
pub struct Cli {
    /// word list to preselect in the menu
    #[clap(short = 'c', long)]
    corpus: Option<String>,

    /// test duration in seconds to preselect (15, 20, 45, 60, 90, 120 or 300)
    #[clap(short = 't', long = "time")]
    duration_secs: Option<u64>,

    /// number of words in the generated paragraph
    #[clap(short = 'w', long = "words")]
    words_per_paragraph: Option<usize>,

    /// directory of word list files, one word per line (defaults to the bundled lists)
    #[clap(long)]
    corpus_dir: Option<PathBuf>,

    /// directory finished results are written to
    #[clap(long)]
    results_dir: Option<PathBuf>,

    /// file format for saved results
    #[clap(long, value_enum)]
    format: Option<ResultFormat>,

    /// seed for reproducible word selection
    #[clap(long)]
    seed: Option<u64>,

    /// print the available word lists and exit
    #[clap(long)]
    list_corpora: bool,

    /// persist the given options as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line options over the stored configuration
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(corpus) = &self.corpus {
            config.corpus = Some(corpus.clone());
        }
        if let Some(secs) = self.duration_secs {
            config.duration_secs = Some(secs);
        }
        if let Some(words) = self.words_per_paragraph {
            config.words_per_paragraph = words;
        }
        if let Some(dir) = &self.corpus_dir {
            config.corpus_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = Some(dir.clone());
        }
        if let Some(format) = self.format {
            config.result_format = format;
        }
        config
    }
}

/// Settings that may be written back as defaults
fn check_saveable(config: &Config) -> Result<(), String> {
    if let Some(secs) = config.duration_secs {
        if !AVAILABLE_TIMES.contains(&secs) {
            return Err(format!(
                "cannot save duration {secs}s, expected one of {AVAILABLE_TIMES:?}"
            ));
        }
    }
    if config.words_per_paragraph == 0 {
        return Err("cannot save 0 words per paragraph".to_string());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    let config_store = FileConfigStore::new();
    let config = cli.merge_into(config_store.load());

    if cli.save_config {
        if let Err(msg) = check_saveable(&config) {
            Cli::command().error(ErrorKind::InvalidValue, msg).exit();
        }
        config_store.save(&config)?;
        info!(path = %config_store.path().display(), "config saved");
    }

    let store = store_for(config.corpus_dir.as_deref());

    if cli.list_corpora {
        for id in store.list() {
            println!("{id}");
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let sink = FileResultSink::new(config.results_dir(), config.result_format);
    let mut app = App::with_seed(config, store, Box::new(sink), cli.seed)
        .with_config_store(Box::new(config_store));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &outcome {
        warn!(%err, "terminal loop failed");
    }
    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => match app.handle_key(key) {
                KeyOutcome::Quit => break,
                // the first tick of a session lands one full second after it starts
                KeyOutcome::SessionStarted => runner.reset_cadence(),
                KeyOutcome::Handled => {}
            },
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
