//! Section controller: which view is active, and the filter/search/page
//! state that belongs to it.
//!
//! The controller owns the [`ViewState`] outright; callers mutate it only
//! through the methods here.  Every section change resets the state to its
//! defaults, and [`Controller::activate`] tells the caller which load
//! routine the new section needs.

use std::fmt;

use crate::filter::ALL_CATEGORIES;
use crate::paginate::clamp_page;
use crate::source::{ItemId, ItemKind};

const TITLE_PREFIX: &str = "YHA-Network";

/// A top-level view.  Any name is accepted; unknown names are kept as
/// [`Section::Other`] and show nothing beyond the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Home,
    SourceCodes,
    Blog,
    Favorites,
    BlogDetail,
    Other(String),
}

impl Section {
    /// Sections reachable from the navigation bar, in display order.
    pub const NAV: [Section; 4] = [
        Section::Home,
        Section::SourceCodes,
        Section::Blog,
        Section::Favorites,
    ];

    pub fn parse(name: &str) -> Self {
        match name {
            "home" => Section::Home,
            "source_codes" => Section::SourceCodes,
            "blog" => Section::Blog,
            "favorites" => Section::Favorites,
            "blog-detail" => Section::BlogDetail,
            other => Section::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Section::Home => "home",
            Section::SourceCodes => "source_codes",
            Section::Blog => "blog",
            Section::Favorites => "favorites",
            Section::BlogDetail => "blog-detail",
            Section::Other(name) => name,
        }
    }

    /// Navigation label.
    pub fn label(&self) -> String {
        match self {
            Section::Home => "Home".into(),
            Section::SourceCodes => "Source Codes".into(),
            Section::Blog => "Blog".into(),
            Section::Favorites => "Favorites".into(),
            Section::BlogDetail => "Blog Detail".into(),
            Section::Other(name) => capitalize(name),
        }
    }

    /// Window title, e.g. `YHA-Network - Source Codes`.
    pub fn title(&self) -> String {
        format!("{TITLE_PREFIX} - {}", self.label())
    }

    /// Index of the navigation entry to highlight, if any.
    pub fn nav_index(&self) -> Option<usize> {
        Self::NAV.iter().position(|s| s == self)
    }

    /// The collection a searchable section lists.
    pub fn collection(&self) -> Option<ItemKind> {
        match self {
            Section::SourceCodes => Some(ItemKind::SourceCodes),
            Section::Blog => Some(ItemKind::BlogPosts),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// What a freshly activated section needs before it can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRoutine {
    /// Make sure this collection is cached.
    Collection(ItemKind),
    /// Assemble the favorites view from whatever is cached.
    Favorites,
    /// Static content.
    None,
}

/// Mutable view state, reset to defaults on every section change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub section: Section,
    pub category: String,
    pub search: String,
    pub source_codes_page: usize,
    pub blog_posts_page: usize,
    /// Post shown by the detail view.  Survives resets so that activating
    /// the detail section can show it.
    pub detail: Option<ItemId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            section: Section::Home,
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
            source_codes_page: 1,
            blog_posts_page: 1,
            detail: None,
        }
    }
}

impl ViewState {
    pub fn page(&self, kind: ItemKind) -> usize {
        match kind {
            ItemKind::SourceCodes => self.source_codes_page,
            ItemKind::BlogPosts => self.blog_posts_page,
        }
    }

    fn page_mut(&mut self, kind: ItemKind) -> &mut usize {
        match kind {
            ItemKind::SourceCodes => &mut self.source_codes_page,
            ItemKind::BlogPosts => &mut self.blog_posts_page,
        }
    }
}

/// Owner of the [`ViewState`].
#[derive(Debug, Default)]
pub struct Controller {
    state: ViewState,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn section(&self) -> &Section {
        &self.state.section
    }

    /// Switch to `section`, resetting category, search and pages.
    pub fn activate(&mut self, section: Section) -> LoadRoutine {
        tracing::debug!(from = %self.state.section, to = %section, "activating section");

        let detail = self.state.detail;
        self.state = ViewState {
            section,
            detail,
            ..ViewState::default()
        };

        match &self.state.section {
            Section::Favorites => LoadRoutine::Favorites,
            other => other.collection().map_or(LoadRoutine::None, LoadRoutine::Collection),
        }
    }

    /// Select the post for the detail view and switch to it.
    ///
    /// A malformed id leaves everything untouched.
    pub fn show_detail<I: TryInto<ItemId>>(&mut self, id: I) -> Option<LoadRoutine> {
        let id = id.try_into().ok()?;
        self.state.detail = Some(id);
        Some(self.activate(Section::BlogDetail))
    }

    /// Change the category of the active collection, back to page 1.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.state.category = category.into();
        self.reset_page();
    }

    /// Change the search text of the active collection, back to page 1.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.state.search = search.into();
        self.reset_page();
    }

    /// Go to `page` of the active collection, clamped against the number of
    /// records that currently pass the filter.
    pub fn go_to_page(&mut self, page: usize, visible_count: usize, page_size: usize) {
        if let Some(kind) = self.state.section.collection() {
            *self.state.page_mut(kind) = clamp_page(page, visible_count, page_size);
        }
    }

    fn reset_page(&mut self) {
        if let Some(kind) = self.state.section.collection() {
            *self.state.page_mut(kind) = 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_names() {
        for name in ["home", "source_codes", "blog", "favorites", "blog-detail"] {
            assert_eq!(Section::parse(name).name(), name);
        }
        assert_eq!(Section::parse("about"), Section::Other("about".into()));
    }

    #[test]
    fn titles() {
        assert_eq!(Section::SourceCodes.title(), "YHA-Network - Source Codes");
        assert_eq!(Section::BlogDetail.title(), "YHA-Network - Blog Detail");
        assert_eq!(Section::parse("contact").title(), "YHA-Network - Contact");
    }

    #[test]
    fn nav_highlight_follows_section() {
        assert_eq!(Section::Blog.nav_index(), Some(2));
        assert_eq!(Section::BlogDetail.nav_index(), None);
        assert_eq!(Section::parse("about").nav_index(), None);
    }

    #[test]
    fn activate_picks_load_routine() {
        let mut c = Controller::new();
        assert_eq!(c.activate(Section::SourceCodes), LoadRoutine::Collection(ItemKind::SourceCodes));
        assert_eq!(c.activate(Section::Blog), LoadRoutine::Collection(ItemKind::BlogPosts));
        assert_eq!(c.activate(Section::Favorites), LoadRoutine::Favorites);
        assert_eq!(c.activate(Section::Home), LoadRoutine::None);
        assert_eq!(c.activate(Section::parse("nowhere")), LoadRoutine::None);
    }

    #[test]
    fn activate_resets_filters_and_pages() {
        let mut c = Controller::new();
        c.activate(Section::SourceCodes);
        c.set_category("Web");
        c.set_search("react");
        c.go_to_page(3, 40, 8);
        assert_eq!(c.state().source_codes_page, 3);

        c.activate(Section::Blog);
        c.activate(Section::SourceCodes);
        let state = c.state();
        assert_eq!(state.category, "All");
        assert_eq!(state.search, "");
        assert_eq!(state.source_codes_page, 1);
    }

    #[test]
    fn filter_changes_return_to_first_page() {
        let mut c = Controller::new();
        c.activate(Section::Blog);
        c.go_to_page(2, 20, 8);
        c.set_search("rust");
        assert_eq!(c.state().blog_posts_page, 1);

        c.go_to_page(2, 20, 8);
        c.set_category("News");
        assert_eq!(c.state().blog_posts_page, 1);
    }

    #[test]
    fn go_to_page_clamps_against_visible_count() {
        let mut c = Controller::new();
        c.activate(Section::SourceCodes);
        c.go_to_page(9, 20, 8);
        assert_eq!(c.state().source_codes_page, 3);
        c.go_to_page(0, 20, 8);
        assert_eq!(c.state().source_codes_page, 1);
    }

    #[test]
    fn show_detail_switches_section() {
        let mut c = Controller::new();
        c.activate(Section::Blog);
        assert_eq!(c.show_detail(5_u64), Some(LoadRoutine::None));
        assert_eq!(c.section(), &Section::BlogDetail);
        assert_eq!(c.state().detail, Some(ItemId(5)));
    }

    #[test]
    fn show_detail_ignores_malformed_ids() {
        let mut c = Controller::new();
        c.activate(Section::Blog);
        assert_eq!(c.show_detail(2.5_f64), None);
        assert_eq!(c.section(), &Section::Blog);
    }
}
