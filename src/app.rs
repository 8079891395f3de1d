use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::{Config, ConfigStore};
use crate::corpus::CorpusStore;
use crate::error::EngineError;
use crate::generator::{RandomSelector, SeededSelector, WordSelector};
use crate::persist::ResultSink;
use crate::session::{SubmitOutcome, TestSession, TickOutcome, AVAILABLE_TIMES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Typing,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFocus {
    Corpus,
    Duration,
}

/// What the host loop should do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    SessionStarted,
    Quit,
}

/// Corpus and duration pickers
#[derive(Debug, Clone)]
pub struct MenuState {
    pub corpora: Vec<String>,
    pub corpus_idx: Option<usize>,
    pub duration_idx: Option<usize>,
    pub focus: MenuFocus,
    /// configured corpus that is not among the listed ones
    pub pending_corpus: Option<String>,
    /// configured duration that is not one of [`AVAILABLE_TIMES`]
    pub pending_duration: Option<u64>,
}

impl MenuState {
    fn new(corpora: Vec<String>, corpus: Option<&str>, duration_secs: Option<u64>) -> Self {
        let corpus_idx = corpus.and_then(|c| corpora.iter().position(|id| id == c));
        let duration_idx = duration_secs.and_then(|d| AVAILABLE_TIMES.iter().position(|t| *t == d));
        // unlisted values stay selected so starting reports why they are unusable
        let pending_corpus = corpus.filter(|_| corpus_idx.is_none()).map(str::to_string);
        let pending_duration = duration_secs.filter(|_| duration_idx.is_none());
        Self {
            corpora,
            corpus_idx,
            duration_idx,
            focus: MenuFocus::Corpus,
            pending_corpus,
            pending_duration,
        }
    }

    pub fn selected_corpus(&self) -> Option<&str> {
        self.corpus_idx
            .and_then(|i| self.corpora.get(i))
            .map(String::as_str)
            .or(self.pending_corpus.as_deref())
    }

    pub fn selected_duration(&self) -> Option<u64> {
        self.duration_idx
            .and_then(|i| AVAILABLE_TIMES.get(i).copied())
            .or(self.pending_duration)
    }

    fn move_selection(&mut self, down: bool) {
        let (idx, len) = match self.focus {
            MenuFocus::Corpus => {
                self.pending_corpus = None;
                (&mut self.corpus_idx, self.corpora.len())
            }
            MenuFocus::Duration => {
                self.pending_duration = None;
                (&mut self.duration_idx, AVAILABLE_TIMES.len())
            }
        };
        if len == 0 {
            return;
        }
        *idx = Some(match (*idx, down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        });
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            MenuFocus::Corpus => MenuFocus::Duration,
            MenuFocus::Duration => MenuFocus::Corpus,
        };
    }
}

type SessionFactory = Box<dyn Fn(&Config) -> TestSession>;

fn default_session(config: &Config, seed: Option<u64>) -> TestSession {
    let selector: Box<dyn WordSelector> = match seed {
        Some(seed) => Box::new(SeededSelector::new(seed)),
        None => Box::new(RandomSelector),
    };
    TestSession::new()
        .with_selector(selector)
        .with_words_per_paragraph(config.words_per_paragraph)
}

/// Host integration around [`TestSession`]: menu, input buffer, alerts and
/// result persistence
pub struct App {
    pub screen: Screen,
    pub menu: MenuState,
    pub session: TestSession,
    pub input: String,
    pub alert: Option<String>,
    pub saved_to: Option<PathBuf>,
    pub save_error: Option<String>,
    config: Config,
    store: Box<dyn CorpusStore>,
    sink: Box<dyn ResultSink>,
    config_store: Option<Box<dyn ConfigStore>>,
    session_factory: SessionFactory,
}

impl App {
    pub fn new(config: Config, store: Box<dyn CorpusStore>, sink: Box<dyn ResultSink>) -> Self {
        Self::with_seed(config, store, sink, None)
    }

    pub fn with_seed(
        config: Config,
        store: Box<dyn CorpusStore>,
        sink: Box<dyn ResultSink>,
        seed: Option<u64>,
    ) -> Self {
        let menu = MenuState::new(store.list(), config.corpus.as_deref(), config.duration_secs);
        Self {
            screen: Screen::Menu,
            menu,
            session: default_session(&config, seed),
            input: String::new(),
            alert: None,
            saved_to: None,
            save_error: None,
            config,
            store,
            sink,
            config_store: None,
            session_factory: Box::new(move |cfg: &Config| default_session(cfg, seed)),
        }
    }

    /// Remember the last started selection in `store`
    pub fn with_config_store(mut self, store: Box<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Override how sessions are built, e.g. to inject a clock or scripted words
    pub fn with_session_factory(mut self, factory: SessionFactory) -> Self {
        self.session = factory(&self.config);
        self.session_factory = factory;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn raise(&mut self, err: &EngineError) {
        warn!(%err, "alert raised");
        self.alert = Some(err.alert_message());
    }

    /// Start a fresh session with the menu selection
    pub fn start_session(&mut self) -> bool {
        let mut session = (self.session_factory)(&self.config);
        let corpus = self.menu.selected_corpus().map(str::to_string);
        let duration = self.menu.selected_duration();

        if let Err(err) = session.start(self.store.as_ref(), corpus.as_deref(), duration) {
            self.raise(&err);
            return false;
        }

        self.session = session;
        self.input.clear();
        self.saved_to = None;
        self.save_error = None;
        self.screen = Screen::Typing;
        self.remember_selection(corpus, duration);
        true
    }

    fn remember_selection(&mut self, corpus: Option<String>, duration: Option<u64>) {
        if self.config.corpus == corpus && self.config.duration_secs == duration {
            return;
        }
        self.config.corpus = corpus;
        self.config.duration_secs = duration;
        if let Some(store) = &self.config_store {
            if let Err(err) = store.save(&self.config) {
                warn!(%err, "could not save last selection");
            }
        }
    }

    /// Drop the running session and go back to the menu
    pub fn abandon_session(&mut self) {
        if self.session.is_running() {
            info!(corpus = self.session.corpus(), cursor = self.session.cursor(), "session abandoned");
        }
        self.session = (self.session_factory)(&self.config);
        self.input.clear();
        self.screen = Screen::Menu;
    }

    /// Periodic tick from the host timer
    pub fn on_tick(&mut self) {
        if self.screen != Screen::Typing || !self.session.is_running() {
            return;
        }
        match self.session.tick() {
            Ok(TickOutcome::Live(_)) => {}
            Ok(TickOutcome::Finished) => self.on_finished(),
            Err(err) => self.raise(&err),
        }
    }

    /// Submit the input buffer as the current word
    pub fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        match self.session.submit(&text) {
            Ok(SubmitOutcome::Next { .. }) => {}
            Ok(SubmitOutcome::Finished { .. }) => self.on_finished(),
            Err(err) => self.raise(&err),
        }
    }

    fn on_finished(&mut self) {
        self.screen = Screen::Results;
        self.input.clear();

        let Some(report) = self.session.report() else {
            return;
        };
        match self.sink.persist(report) {
            Ok(path) => self.saved_to = Some(path),
            Err(err) => {
                self.save_error = Some(err.to_string());
                self.raise(&err);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        if self.alert.is_some() {
            self.alert = None;
            return KeyOutcome::Handled;
        }

        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Typing => {
                self.handle_typing_key(key);
                KeyOutcome::Handled
            }
            Screen::Results => self.handle_results_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.menu.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.menu.move_selection(true),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.menu.toggle_focus()
            }
            KeyCode::Enter => {
                if self.start_session() {
                    return KeyOutcome::SessionStarted;
                }
            }
            _ => {}
        }
        KeyOutcome::Handled
    }

    fn handle_typing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.abandon_session(),
            KeyCode::Enter => self.submit_input(),
            // a space only ends a word that has been started
            KeyCode::Char(' ') if self.input.trim().is_empty() => {}
            KeyCode::Char(' ') => self.submit_input(),
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Quit,
            KeyCode::Char('r') => {
                if self.start_session() {
                    KeyOutcome::SessionStarted
                } else {
                    KeyOutcome::Handled
                }
            }
            KeyCode::Char('m') => {
                self.abandon_session();
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Handled,
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("menu", &self.menu)
            .field("session", &self.session)
            .field("input", &self.input)
            .field("alert", &self.alert)
            .finish_non_exhaustive()
    }
}
