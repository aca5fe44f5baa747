//! Application state and explicit event dispatch.
//!
//! The terminal loop turns key presses into [`AppEvent`]s and hands them to
//! [`Controller::handle`], which updates [`AppState`] and reports what changed
//! as a list of [`Action`]s. Only actions with effects outside the state
//! (opening a link, status messages) need the terminal loop's attention.

use crate::contact::ContactForm;
use crate::filter::{self, ALL_CATEGORIES};
use crate::nav::{NavigationController, Section};
use crate::product::Product;
use crate::repository::{LoadError, ProductRepository};
use crate::theme::{ThemePreference, ThemeState};
use crate::view::{self, DisplayModel};

// ---------------------------------------------------------------------------
// Events and actions
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum AppEvent {
    Loaded(Result<Vec<Product>, LoadError>),
    CategorySelected(String),
    SearchChanged(String),
    ThemeToggled,
    MenuToggled,
    LinkActivated(Section),
    /// New viewport width, in width units.
    Resized(u32),
    SelectNext,
    SelectPrev,
    OpenSelected,
    ContactInput(char),
    ContactBackspace,
    ContactNextField,
    ContactSubmit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadIndicator {
    Loading,
    Ready,
    Failed(String),
}

/// What a handled event changed. `handle` has already written every change
/// into [`AppState`], which is what the renderer draws from, so `Render`,
/// `ApplyTheme`, `NavigationChanged` and `Indicator` are notifications only.
/// `OpenLink` and `Notify` are the ones the terminal loop must carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Render(DisplayModel),
    ApplyTheme(ThemeState),
    NavigationChanged(bool),
    Indicator(LoadIndicator),
    OpenLink(String),
    Notify(String),
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Transient filter inputs. Whichever was changed last decides the result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub active_category: String,
    pub search_query: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_category: ALL_CATEGORIES.to_string(),
            search_query: String::new(),
        }
    }
}

pub struct AppState {
    pub repository: ProductRepository,
    pub filter: FilterState,
    /// `None` until the first render.
    pub display: Option<DisplayModel>,
    pub indicator: LoadIndicator,
    pub categories: Vec<String>,
    pub theme: ThemePreference,
    pub nav: NavigationController,
    pub viewport_width: u32,
    pub section: Section,
    pub contact: ContactForm,
    pub selected: usize,
}

pub struct Controller {
    pub state: AppState,
}

impl Controller {
    pub fn new(theme: ThemePreference, narrow_width: u32, viewport_width: u32) -> Self {
        Self {
            state: AppState {
                repository: ProductRepository::new(),
                filter: FilterState::default(),
                display: None,
                indicator: LoadIndicator::Loading,
                categories: vec![ALL_CATEGORIES.to_string()],
                theme,
                nav: NavigationController::new(narrow_width, viewport_width),
                viewport_width,
                section: Section::Products,
                contact: ContactForm::default(),
                selected: 0,
            },
        }
    }

    /// Startup sequence. The loading indicator is shown before the caller
    /// starts the load; it clears only when `Loaded` arrives.
    pub fn start(&mut self) -> Vec<Action> {
        self.state.indicator = LoadIndicator::Loading;
        let theme = self.state.theme.apply_on_startup();
        tracing::debug!(?theme, "applied startup theme");
        vec![
            Action::Indicator(LoadIndicator::Loading),
            Action::ApplyTheme(theme),
            Action::NavigationChanged(self.state.nav.is_expanded()),
        ]
    }

    pub fn handle(&mut self, event: AppEvent) -> Vec<Action> {
        match event {
            AppEvent::Loaded(result) => self.on_loaded(result),
            AppEvent::CategorySelected(category) => {
                let products = self.state.repository.current();
                let model = view::render(&filter::filter_by_category(products, &category));
                self.state.filter.active_category = category;
                vec![self.show(model)]
            }
            AppEvent::SearchChanged(query) => {
                let products = self.state.repository.current();
                let model = view::render(&filter::search(products, &query));
                self.state.filter.search_query = query;
                vec![self.show(model)]
            }
            AppEvent::ThemeToggled => {
                let next = self.state.theme.current().opposite();
                let mut actions = Vec::new();
                if let Err(e) = self.state.theme.set(next) {
                    tracing::warn!("failed to save theme preference: {e:#}");
                    actions.push(Action::Notify(format!(
                        "Could not save theme preference: {e}"
                    )));
                }
                actions.insert(0, Action::ApplyTheme(next));
                actions
            }
            AppEvent::MenuToggled => {
                self.state.nav.toggle();
                vec![Action::NavigationChanged(self.state.nav.is_expanded())]
            }
            AppEvent::LinkActivated(section) => {
                if !self.state.nav.is_expanded() {
                    return Vec::new();
                }
                self.state.section = section;
                self.state.nav.on_link_activated(self.state.viewport_width);
                vec![Action::NavigationChanged(self.state.nav.is_expanded())]
            }
            AppEvent::Resized(width) => {
                self.state.viewport_width = width;
                let before = self.state.nav.is_expanded();
                self.state.nav.on_viewport_resize(width);
                let after = self.state.nav.is_expanded();
                if before == after {
                    Vec::new()
                } else {
                    vec![Action::NavigationChanged(after)]
                }
            }
            AppEvent::SelectNext => {
                let count = self.card_count();
                if count > 0 {
                    self.state.selected = (self.state.selected + 1).min(count - 1);
                }
                Vec::new()
            }
            AppEvent::SelectPrev => {
                self.state.selected = self.state.selected.saturating_sub(1);
                Vec::new()
            }
            AppEvent::OpenSelected => {
                let target = self
                    .state
                    .display
                    .as_ref()
                    .and_then(|d| d.cards().get(self.state.selected))
                    .map(|card| card.link.target.clone());
                match target {
                    Some(target) if !target.is_empty() => vec![Action::OpenLink(target)],
                    _ => Vec::new(),
                }
            }
            AppEvent::ContactInput(c) => {
                self.state.contact.input(c);
                Vec::new()
            }
            AppEvent::ContactBackspace => {
                self.state.contact.backspace();
                Vec::new()
            }
            AppEvent::ContactNextField => {
                self.state.contact.next_field();
                Vec::new()
            }
            AppEvent::ContactSubmit => {
                vec![Action::Notify(self.state.contact.submit().to_string())]
            }
        }
    }

    fn on_loaded(&mut self, result: Result<Vec<Product>, LoadError>) -> Vec<Action> {
        match result {
            Ok(products) => {
                let count = products.len();
                if !self.state.repository.store(products) {
                    return Vec::new();
                }
                tracing::info!(count, "products loaded");
                self.state.categories = filter::categories(self.state.repository.current());
                self.state.indicator = LoadIndicator::Ready;

                let all: Vec<&Product> = self.state.repository.current().iter().collect();
                let model = view::render(&all);
                vec![Action::Indicator(LoadIndicator::Ready), self.show(model)]
            }
            Err(e) => {
                tracing::error!("error loading products: {e}");
                let message = format!("Error loading products: {e}. Please restart to try again.");
                self.state.indicator = LoadIndicator::Failed(message.clone());
                vec![Action::Indicator(LoadIndicator::Failed(message))]
            }
        }
    }

    fn show(&mut self, model: DisplayModel) -> Action {
        self.state.selected = 0;
        self.state.display = Some(model.clone());
        Action::Render(model)
    }

    fn card_count(&self) -> usize {
        self.state.display.as_ref().map_or(0, |d| d.cards().len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
