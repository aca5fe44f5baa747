use std::io::stdout;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::cli::Cli;
use crate::controller::{Action, AppEvent, Controller};
use crate::loader::{LoadEvent, ProductLoader};
use crate::nav::{columns_to_units, Section};
use crate::renderer;
use crate::repository::ProductSource;
use crate::theme::{default_preferences_path, ThemePreference};

/// How long freshly rendered cards keep their entrance style.
const ENTRANCE_DELAY: Duration = Duration::from_millis(100);

/// How long a status message stays on the legend line.
const STATUS_TTL: Duration = Duration::from_secs(4);

/// Raw mode and the alternate screen, undone when dropped so an error
/// returned from the draw loop still leaves a usable shell.
#[derive(Debug, Default)]
struct TerminalGuard {
    raw_mode: bool,
    alternate_screen: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        let mut guard = Self::default();
        enable_raw_mode()?;
        guard.raw_mode = true;
        execute!(stdout(), EnterAlternateScreen)?;
        guard.alternate_screen = true;
        Ok(guard)
    }

    /// Undo whatever `enter` managed to set up. Safe to call more than once.
    fn restore(&mut self) -> Result<()> {
        if self.alternate_screen {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            self.alternate_screen = false;
        }
        if self.raw_mode {
            disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!("failed to restore terminal: {e:#}");
        }
    }
}

/// Main application state and run loop.
pub struct App {
    pub controller: Controller,
    pub source: ProductSource,
    pub timeout: Option<Duration>,
    pub running: bool,
    /// Whether the search bar is accepting keystrokes.
    pub search_active: bool,
    /// Whether the contact form is accepting keystrokes.
    pub form_active: bool,
    pub rendered_at: Option<Instant>,
    pub status: Option<(String, Instant)>,
}

impl App {
    /// Build a new `App` from parsed CLI arguments and the starting terminal
    /// width in columns.
    pub fn new(cli: &Cli, columns: u16) -> Self {
        let preferences = cli.preferences.clone().or_else(default_preferences_path);
        if preferences.is_none() {
            tracing::warn!("no config directory; theme preference will not persist");
        }

        let controller = Controller::new(
            ThemePreference::new(preferences),
            cli.narrow_width,
            columns_to_units(columns),
        );

        Self {
            controller,
            source: ProductSource::parse(&cli.source),
            timeout: cli.request_timeout(),
            running: true,
            search_active: false,
            form_active: false,
            rendered_at: None,
            status: None,
        }
    }

    /// Run the main TUI event loop.
    pub fn run(&mut self) -> Result<()> {
        // 1. Startup: the loading indicator is up before the load begins.
        let actions = self.controller.start();
        self.apply(actions);

        let loader = ProductLoader::new()?;
        let load_rx = loader.start(self.source.clone(), self.timeout);

        // 2. Set up the terminal. The guard puts it back on every exit path.
        let mut guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;

        // 3. Main loop.
        while self.running {
            if self
                .status
                .as_ref()
                .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL)
            {
                self.status = None;
            }

            let entering = self
                .rendered_at
                .is_some_and(|at| at.elapsed() < ENTRANCE_DELAY);
            let status = self.status.as_ref().map(|(s, _)| s.as_str());
            let state = &self.controller.state;
            let search_active = self.search_active;
            terminal.draw(|frame| {
                renderer::render_ui(frame, state, search_active, entering, status);
            })?;

            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Key(key) => self.on_key(key),
                    Event::Resize(columns, _) => {
                        self.dispatch(AppEvent::Resized(columns_to_units(columns)))
                    }
                    _ => {}
                }
            }

            self.poll_load(&load_rx);
        }

        // 4. Cleanup — restore the terminal.
        guard.restore()?;

        Ok(())
    }

    fn poll_load(&mut self, rx: &mpsc::Receiver<LoadEvent>) {
        if let Ok(LoadEvent::Finished(result)) = rx.try_recv() {
            self.dispatch(AppEvent::Loaded(result));
        }
    }

    pub fn dispatch(&mut self, event: AppEvent) {
        let actions = self.controller.handle(event);
        self.apply(actions);
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Render(model) => {
                    tracing::debug!(
                        elements = model.element_count(),
                        placeholder = model.is_placeholder(),
                        "rendered products"
                    );
                    self.rendered_at = Some(Instant::now());
                }
                Action::OpenLink(url) => {
                    tracing::info!(%url, "opening product link");
                    if let Err(e) = open::that(&url) {
                        tracing::warn!(%url, "failed to open link: {e}");
                        self.set_status(format!("Could not open link: {e}"));
                    }
                }
                Action::Notify(message) => self.set_status(message),
                Action::ApplyTheme(theme) => tracing::debug!(?theme, "theme applied"),
                Action::NavigationChanged(expanded) => {
                    tracing::debug!(expanded, "navigation changed")
                }
                Action::Indicator(indicator) => tracing::debug!(?indicator, "load indicator"),
            }
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = Some((message, Instant::now()));
    }

    /// Map a key press onto controller events.
    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits, regardless of input mode.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if self.search_active {
            let mut query = self.controller.state.filter.search_query.clone();
            match key.code {
                KeyCode::Esc => {
                    self.search_active = false;
                    query.clear();
                }
                KeyCode::Enter => {
                    self.search_active = false;
                    return;
                }
                KeyCode::Backspace => {
                    query.pop();
                }
                KeyCode::Char(c) => query.push(c),
                _ => return,
            }
            self.dispatch(AppEvent::SearchChanged(query));
            return;
        }

        if self.form_active && self.controller.state.section == Section::Contact {
            match key.code {
                KeyCode::Esc => self.form_active = false,
                KeyCode::Tab => self.dispatch(AppEvent::ContactNextField),
                KeyCode::Enter => self.dispatch(AppEvent::ContactSubmit),
                KeyCode::Backspace => self.dispatch(AppEvent::ContactBackspace),
                KeyCode::Char(c) => self.dispatch(AppEvent::ContactInput(c)),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.running = false,
            KeyCode::Char('t') => self.dispatch(AppEvent::ThemeToggled),
            KeyCode::Char('m') => self.dispatch(AppEvent::MenuToggled),
            KeyCode::Char(c @ '1'..='3') => {
                let index = (c as usize) - ('1' as usize);
                self.dispatch(AppEvent::LinkActivated(Section::ALL[index]));
                self.form_active = self.controller.state.section == Section::Contact;
            }
            _ if self.controller.state.section == Section::Contact => {
                if matches!(key.code, KeyCode::Char('i') | KeyCode::Enter) {
                    self.form_active = true;
                }
            }
            _ if self.controller.state.section != Section::Products => {}
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Left | KeyCode::Char('h') => self.cycle_category(-1),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_category(1),
            KeyCode::Char('j') | KeyCode::Down => self.dispatch(AppEvent::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => self.dispatch(AppEvent::SelectPrev),
            KeyCode::Char('o') | KeyCode::Enter => self.dispatch(AppEvent::OpenSelected),
            _ => {}
        }
    }

    /// Activate the category button `step` places from the active one.
    fn cycle_category(&mut self, step: isize) {
        let categories = &self.controller.state.categories;
        let current = categories
            .iter()
            .position(|c| *c == self.controller.state.filter.active_category)
            .unwrap_or(0);
        let len = categories.len() as isize;
        let next = (current as isize + step).rem_euclid(len) as usize;
        let category = categories[next].clone();
        self.dispatch(AppEvent::CategorySelected(category));
    }
}
