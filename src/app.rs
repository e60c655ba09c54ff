//! Application state and command handlers.
//!
//! [`App`] owns everything the UI needs: the section controller, the
//! collection cache, the preference store, the fetcher and the selection in
//! the visible card list.  Key handling in [`crate::input`] turns key events
//! into [`Command`]s; [`App::dispatch`] runs them against in-memory state
//! and never blocks.  Views are rebuilt from scratch on every frame by the
//! pure projections in [`crate::view`].

use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

use crate::cache::CollectionCache;
use crate::debounce::Debouncer;
use crate::fetch::{FetchMsg, Fetcher};
use crate::filter::{categories, filter};
use crate::paginate::total_pages;
use crate::section::{Controller, LoadRoutine, Section};
use crate::source::{ItemId, ItemKind};
use crate::store::{Favorites, PreferenceStore};
use crate::view::{
    blog_detail, favorites_view, list_view, Card, DetailView, FavoritesView, ListQuery, ListView,
};

/// A user action, as produced by the key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Activate(Section),
    NextSection,
    PreviousSection,
    NextCategory,
    PreviousCategory,
    /// Enter search input mode.
    BeginSearch,
    SearchInput(char),
    SearchBackspace,
    /// Leave search input mode, keeping the query.
    EndSearch,
    /// Clear the query immediately, bypassing the debounce.
    ClearSearch,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    /// Toggle the favorite on the selected card, or on the open post.
    ToggleFavorite,
    /// Open the detail view for the selected blog card.
    OpenSelected,
    /// Leave the detail view.
    Back,
    Quit,
}

pub struct App {
    controller: Controller,
    pub cache: CollectionCache,
    store: PreferenceStore,
    /// Favorites snapshot, refreshed after every toggle.
    favorites: Favorites,
    fetcher: Fetcher,
    search: Debouncer<String>,
    /// Query being typed; `Some` while in search input mode.
    pub search_input: Option<String>,
    /// Selection within the visible cards.
    pub list_state: ListState,
    page_size: usize,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last load or action status message.
    pub status: String,
}

impl App {
    pub fn new(store: PreferenceStore, fetcher: Fetcher, page_size: usize, search_debounce: Duration) -> Self {
        let favorites = store.favorites();
        Self {
            controller: Controller::new(),
            cache: CollectionCache::new(),
            store,
            favorites,
            fetcher,
            search: Debouncer::new(search_debounce),
            search_input: None,
            list_state: ListState::default(),
            page_size: page_size.max(1),
            quit: false,
            status: "Ready".into(),
        }
    }

    pub fn section(&self) -> &Section {
        self.controller.section()
    }

    pub fn title(&self) -> String {
        self.section().title()
    }

    #[cfg(test)]
    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    // -- command dispatch ----------------------------------------------------

    pub fn dispatch(&mut self, command: Command, now: Instant) {
        match command {
            Command::Activate(section) => self.activate(section),
            Command::NextSection => self.cycle_section(1),
            Command::PreviousSection => self.cycle_section(Section::NAV.len() - 1),
            Command::NextCategory => self.cycle_category(true),
            Command::PreviousCategory => self.cycle_category(false),
            Command::BeginSearch => {
                if self.section().collection().is_some() {
                    self.search_input = Some(self.controller.state().search.clone());
                }
            }
            Command::SearchInput(c) => {
                if let Some(query) = &mut self.search_input {
                    query.push(c);
                    self.search.push(query.clone(), now);
                }
            }
            Command::SearchBackspace => {
                if let Some(query) = &mut self.search_input {
                    query.pop();
                    self.search.push(query.clone(), now);
                }
            }
            Command::EndSearch => self.search_input = None,
            Command::ClearSearch => self.clear_search(),
            Command::NextPage => self.step_page(true),
            Command::PreviousPage => self.step_page(false),
            Command::FirstPage => self.go_to_page(1),
            Command::LastPage => self.go_to_last_page(),
            Command::SelectNext => self.select_next(),
            Command::SelectPrevious => self.select_previous(),
            Command::SelectFirst => self.select_first(),
            Command::SelectLast => self.select_last(),
            Command::ToggleFavorite => self.toggle_selected_favorite(),
            Command::OpenSelected => self.open_selected(),
            Command::Back => {
                if *self.section() == Section::BlogDetail {
                    self.activate(Section::Blog);
                }
            }
            Command::Quit => self.quit = true,
        }
    }

    /// Switch sections and run the new section's load routine.
    pub fn activate(&mut self, section: Section) {
        self.search.cancel();
        self.search_input = None;

        match self.controller.activate(section) {
            LoadRoutine::Collection(kind) => {
                if self.cache.ensure_loaded(kind) {
                    self.fetcher.request(kind);
                }
            }
            LoadRoutine::Favorites => self.favorites = self.store.favorites(),
            LoadRoutine::None => {}
        }
        self.reset_selection();
    }

    fn cycle_section(&mut self, step: usize) {
        let nav = &Section::NAV;
        let next = match self.section().nav_index() {
            Some(i) => nav[(i + step) % nav.len()].clone(),
            None => Section::Home,
        };
        self.activate(next);
    }

    fn cycle_category(&mut self, forward: bool) {
        let Some(kind) = self.section().collection() else {
            return;
        };
        let options = match kind {
            ItemKind::SourceCodes => categories(&self.cache.source_codes.items),
            ItemKind::BlogPosts => categories(&self.cache.blog_posts.items),
        };
        let current = options
            .iter()
            .position(|c| *c == self.controller.state().category)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        self.controller.set_category(options[next].clone());
        self.reset_selection();
    }

    fn clear_search(&mut self) {
        self.search.cancel();
        self.search_input = None;
        if self.section().collection().is_some() {
            self.controller.set_search("");
            self.reset_selection();
        }
    }

    fn step_page(&mut self, forward: bool) {
        let Some(kind) = self.section().collection() else {
            return;
        };
        let current = self.controller.state().page(kind);
        let target = if forward { current + 1 } else { current.saturating_sub(1) };
        self.go_to_page(target);
    }

    fn go_to_last_page(&mut self) {
        let Some(kind) = self.section().collection() else {
            return;
        };
        let last = total_pages(self.visible_count(kind), self.page_size);
        self.go_to_page(last);
    }

    /// Jump to `page` of the active list, clamped to the filtered result.
    pub fn go_to_page(&mut self, page: usize) {
        let Some(kind) = self.section().collection() else {
            return;
        };
        let visible = self.visible_count(kind);
        self.controller.go_to_page(page, visible, self.page_size);
        self.reset_selection();
    }

    fn visible_count(&self, kind: ItemKind) -> usize {
        let state = self.controller.state();
        match kind {
            ItemKind::SourceCodes => filter(&self.cache.source_codes.items, &state.category, &state.search).len(),
            ItemKind::BlogPosts => filter(&self.cache.blog_posts.items, &state.category, &state.search).len(),
        }
    }

    fn toggle_selected_favorite(&mut self) {
        let target = match self.section() {
            Section::BlogDetail => self
                .controller
                .state()
                .detail
                .filter(|&id| self.cache.blog_posts.find(id).is_some())
                .map(|id| (id, ItemKind::BlogPosts)),
            _ => self.selected_card().map(|card| (card.id(), card.kind())),
        };
        let Some((id, kind)) = target else {
            return;
        };

        let now_favorited = self.store.toggle_favorite(id, kind);
        self.favorites = self.store.favorites();
        self.status = if now_favorited {
            format!("Added {id} to favorites")
        } else {
            format!("Removed {id} from favorites")
        };

        // An unfavorited card vanishes from the favorites view.
        let len = self.visible_cards().len();
        match self.list_state.selected() {
            Some(_) if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    fn open_selected(&mut self) {
        if let Some(Card::Blog(card)) = self.selected_card() {
            self.show_detail(card.id);
        }
    }

    /// Open the detail view for blog post `id`.  Malformed ids are ignored;
    /// ids that are not cached show the not-found view.
    pub fn show_detail<I: TryInto<ItemId>>(&mut self, id: I) {
        self.search.cancel();
        self.search_input = None;
        if self.controller.show_detail(id).is_some() {
            self.reset_selection();
        }
    }

    // -- background events ---------------------------------------------------

    /// Drain finished fetches and release a due search.  Called every tick.
    pub fn tick(&mut self, now: Instant) {
        while let Some(msg) = self.fetcher.try_recv() {
            self.apply_fetch(msg);
        }
        if let Some(query) = self.search.poll(now) {
            if self.section().collection().is_some() {
                self.controller.set_search(query);
                self.reset_selection();
            }
        }
    }

    /// Store a fetch outcome in the cache.
    pub fn apply_fetch(&mut self, msg: FetchMsg) {
        let kind = msg.kind;
        match self.cache.complete(kind, msg.result) {
            Ok(count) => {
                tracing::info!(%kind, count, "collection loaded");
                self.status = format!(
                    "Loaded {count} {} at {}",
                    kind.label(),
                    chrono::Local::now().format("%H:%M:%S")
                );
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "collection failed to load");
                self.status = crate::view::failure_message(kind);
            }
        }
        if self.section().collection() == Some(kind) {
            self.reset_selection();
        }
    }

    // -- views ---------------------------------------------------------------

    /// The list view of the active collection section.
    pub fn list_view(&self, kind: ItemKind) -> ListView {
        let state = self.controller.state();
        let query = ListQuery {
            category: &state.category,
            search: &state.search,
            page: state.page(kind),
            page_size: self.page_size,
        };
        list_view(&self.cache, kind, query, &self.favorites)
    }

    pub fn detail_view(&self) -> DetailView {
        blog_detail(&self.cache, self.controller.state().detail, &self.favorites)
    }

    pub fn favorites_view(&self) -> FavoritesView {
        favorites_view(&self.cache, &self.favorites)
    }

    /// Cards currently on screen, in display order.
    pub fn visible_cards(&self) -> Vec<Card> {
        match self.section() {
            Section::Favorites => self.favorites_view().cards().to_vec(),
            section => match section.collection() {
                Some(kind) => self.list_view(kind).cards().to_vec(),
                None => Vec::new(),
            },
        }
    }

    pub fn selected_card(&self) -> Option<Card> {
        let index = self.list_state.selected()?;
        self.visible_cards().into_iter().nth(index)
    }

    /// Number of records in the active collection, for the status bar.
    pub fn collection_size(&self) -> Option<(usize, ItemKind)> {
        let kind = self.section().collection()?;
        Some((self.cache.len(kind), kind))
    }

    // -- navigation ----------------------------------------------------------

    fn reset_selection(&mut self) {
        let selected = (!self.visible_cards().is_empty()).then_some(0);
        self.list_state.select(selected);
    }

    pub fn select_next(&mut self) {
        let len = self.visible_cards().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_cards().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.visible_cards().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_cards().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    #[cfg(test)]
    fn state(&self) -> &crate::section::ViewState {
        self.controller.state()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
