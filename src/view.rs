//! View models: what each section shows, independent of how it is drawn.
//!
//! Everything here is a pure projection of the cache, the view state and a
//! favorites snapshot.  [`crate::ui`] turns these into widgets; tests assert
//! on them directly.

use crate::cache::{Collection, CollectionCache, LoadStatus};
use crate::filter::{categories, filter};
use crate::paginate::{page_descriptor, paginate, NavEntry};
use crate::source::{BlogPost, ItemId, ItemKind, Record, SourceCode};
use crate::store::{is_member, Favorites};

pub const PLACEHOLDER_THUMBNAIL: &str = "https://via.placeholder.com/150";

/// Appended to a repository URL to get its default-branch ZIP archive.
pub const ARCHIVE_SUFFIX: &str = "/archive/refs/heads/main.zip";

pub const NOT_FOUND_MESSAGE: &str = "Blog post not found.";
pub const NO_FAVORITES_MESSAGE: &str = "No favorites added yet.";
pub const LOADING_MESSAGE: &str = "Loading...";
pub const NO_CATEGORIES_HINT: &str = "No categories available";

const EXCERPT_CHARS: usize = 100;

/// Fixed message shown in place of a list whose fetch failed.
pub fn failure_message(kind: ItemKind) -> String {
    format!("Failed to load {}.", kind.label())
}

/// Fixed message shown when filtering leaves nothing.
pub fn empty_message(kind: ItemKind) -> String {
    format!("No {} found.", kind.label())
}

/// A source-code listing as a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCard {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub date: String,
    pub thumbnail: String,
    /// Demo link; `None` renders a disabled control.
    pub demo: Option<String>,
    /// ZIP download link; `None` renders a disabled control.
    pub download: Option<String>,
    pub favorited: bool,
}

/// A blog post as a card, with its content cut down to an excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogCard {
    pub id: ItemId,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub author: String,
    pub date: String,
    pub thumbnail: String,
    pub favorited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Source(SourceCard),
    Blog(BlogCard),
}

impl Card {
    pub fn id(&self) -> ItemId {
        match self {
            Card::Source(c) => c.id,
            Card::Blog(c) => c.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Card::Source(_) => ItemKind::SourceCodes,
            Card::Blog(_) => ItemKind::BlogPosts,
        }
    }

    pub fn favorited(&self) -> bool {
        match self {
            Card::Source(c) => c.favorited,
            Card::Blog(c) => c.favorited,
        }
    }

    /// Label of the favorite toggle.
    pub fn favorite_label(&self) -> &'static str {
        if self.favorited() {
            "Unfavorite"
        } else {
            "Favorite"
        }
    }
}

fn or(value: Option<&str>, fallback: &str) -> String {
    value.unwrap_or(fallback).to_string()
}

pub fn source_card(code: &SourceCode, favorites: &Favorites) -> SourceCard {
    SourceCard {
        id: code.id,
        title: or(code.title.as_deref(), "Untitled"),
        description: or(code.description.as_deref(), "No description"),
        category: or(code.category.as_deref(), "Uncategorized"),
        author: or(code.author.as_deref(), "Unknown"),
        date: or(code.date.as_deref(), "N/A"),
        thumbnail: or(code.thumbnail.as_deref(), PLACEHOLDER_THUMBNAIL),
        demo: code.demo.clone(),
        download: code.repository.as_ref().map(|repo| format!("{repo}{ARCHIVE_SUFFIX}")),
        favorited: is_member(favorites, code.id, ItemKind::SourceCodes),
    }
}

pub fn blog_card(post: &BlogPost, favorites: &Favorites) -> BlogCard {
    let content = post.content.as_deref().unwrap_or("No content");
    let excerpt: String = content.chars().take(EXCERPT_CHARS).collect();

    BlogCard {
        id: post.id,
        title: or(post.title.as_deref(), "Untitled"),
        excerpt: format!("{excerpt}..."),
        category: or(post.category.as_deref(), "Uncategorized"),
        author: or(post.author.as_deref(), "Unknown"),
        date: or(post.date.as_deref(), "N/A"),
        thumbnail: or(post.thumbnail.as_deref(), PLACEHOLDER_THUMBNAIL),
        favorited: is_member(favorites, post.id, ItemKind::BlogPosts),
    }
}

/// The filter and page a list is being viewed with.
#[derive(Debug, Clone, Copy)]
pub struct ListQuery<'a> {
    pub category: &'a str,
    pub search: &'a str,
    pub page: usize,
    pub page_size: usize,
}

/// The body of a collection section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    Loading,
    Failed(String),
    Empty(String),
    Cards {
        cards: Vec<Card>,
        page: usize,
        total_pages: usize,
        nav: Option<Vec<NavEntry>>,
    },
}

/// A collection section: its category options plus the visible page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub kind: ItemKind,
    /// `"All"` followed by the collection's categories.
    pub categories: Vec<String>,
    pub category: String,
    pub search: String,
    pub body: ListBody,
}

impl ListView {
    /// Hint shown in the category selector when there is nothing to pick.
    pub fn category_hint(&self) -> Option<&'static str> {
        (self.categories.len() <= 1).then_some(NO_CATEGORIES_HINT)
    }

    pub fn cards(&self) -> &[Card] {
        match &self.body {
            ListBody::Cards { cards, .. } => cards,
            _ => &[],
        }
    }
}

/// Project the visible page of `kind` for `query`.
pub fn list_view(
    cache: &CollectionCache,
    kind: ItemKind,
    query: ListQuery<'_>,
    favorites: &Favorites,
) -> ListView {
    let (categories, body) = match kind {
        ItemKind::SourceCodes => list_body(&cache.source_codes, query, |code| {
            Card::Source(source_card(code, favorites))
        }),
        ItemKind::BlogPosts => list_body(&cache.blog_posts, query, |post| {
            Card::Blog(blog_card(post, favorites))
        }),
    };

    ListView {
        kind,
        categories,
        category: query.category.to_string(),
        search: query.search.to_string(),
        body,
    }
}

fn list_body<T: Record>(
    collection: &Collection<T>,
    query: ListQuery<'_>,
    project: impl Fn(&T) -> Card,
) -> (Vec<String>, ListBody) {
    let options = categories(&collection.items);

    if collection.items.is_empty() {
        let body = match collection.status {
            LoadStatus::Failed => ListBody::Failed(failure_message(T::KIND)),
            LoadStatus::Idle | LoadStatus::Loading => ListBody::Loading,
            LoadStatus::Loaded { .. } => ListBody::Empty(empty_message(T::KIND)),
        };
        return (options, body);
    }

    let visible = filter(&collection.items, query.category, query.search);
    if visible.is_empty() {
        return (options, ListBody::Empty(empty_message(T::KIND)));
    }

    let page = paginate(&visible, query.page, query.page_size);
    let body = ListBody::Cards {
        cards: page.items.iter().map(|item| project(item)).collect(),
        page: page.number,
        total_pages: page.total_pages,
        nav: page_descriptor(visible.len(), page.number, query.page_size),
    };
    (options, body)
}

/// A single blog post shown in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDetail {
    pub id: ItemId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub date: String,
    pub thumbnail: String,
    pub favorited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Found(BlogDetail),
    NotFound,
}

/// Look up a blog post for the detail view.  A miss is not an error.
pub fn blog_detail(cache: &CollectionCache, id: Option<ItemId>, favorites: &Favorites) -> DetailView {
    let Some(post) = id.and_then(|id| cache.blog_posts.find(id)) else {
        return DetailView::NotFound;
    };

    DetailView::Found(BlogDetail {
        id: post.id,
        title: or(post.title.as_deref(), "Untitled"),
        content: or(post.content.as_deref(), "No content"),
        category: or(post.category.as_deref(), "Uncategorized"),
        author: or(post.author.as_deref(), "Unknown"),
        date: or(post.date.as_deref(), "N/A"),
        thumbnail: or(post.thumbnail.as_deref(), PLACEHOLDER_THUMBNAIL),
        favorited: is_member(favorites, post.id, ItemKind::BlogPosts),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesView {
    Empty(&'static str),
    /// Favorited source codes first, then blog posts, each in cache order.
    Cards(Vec<Card>),
}

impl FavoritesView {
    pub fn cards(&self) -> &[Card] {
        match self {
            FavoritesView::Cards(cards) => cards,
            FavoritesView::Empty(_) => &[],
        }
    }
}

/// Favorited records that are currently cached.  Favorites pointing at
/// records that are not cached are skipped.
pub fn favorites_view(cache: &CollectionCache, favorites: &Favorites) -> FavoritesView {
    let codes = cache
        .source_codes
        .items
        .iter()
        .filter(|code| is_member(favorites, code.id, ItemKind::SourceCodes))
        .map(|code| Card::Source(source_card(code, favorites)));
    let posts = cache
        .blog_posts
        .items
        .iter()
        .filter(|post| is_member(favorites, post.id, ItemKind::BlogPosts))
        .map(|post| Card::Blog(blog_card(post, favorites)));

    let cards: Vec<Card> = codes.chain(posts).collect();
    if cards.is_empty() {
        FavoritesView::Empty(NO_FAVORITES_MESSAGE)
    } else {
        FavoritesView::Cards(cards)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ALL_CATEGORIES;
    use crate::paginate::PAGE_SIZE;
    use serde_json::json;

    fn query(page: usize) -> ListQuery<'static> {
        ListQuery {
            category: ALL_CATEGORIES,
            search: "",
            page,
            page_size: PAGE_SIZE,
        }
    }

    fn loaded_cache() -> CollectionCache {
        let codes: Vec<_> = (0..20)
            .map(|i| {
                let category = if i % 2 == 0 { "Even" } else { "Odd" };
                json!({"id": i, "title": format!("Code {i}"), "category": category})
            })
            .collect();
        let mut cache = CollectionCache::new();
        cache.complete(ItemKind::SourceCodes, Ok(json!(codes))).unwrap();
        cache
            .complete(
                ItemKind::BlogPosts,
                Ok(json!([
                    {"id": 1, "title": "Short", "content": "tiny"},
                    {"id": 2, "content": "x".repeat(150)}
                ])),
            )
            .unwrap();
        cache
    }

    fn favorites(entries: &[(ItemKind, u64)]) -> Favorites {
        let mut favs = Favorites::new();
        for &(kind, id) in entries {
            favs.entry(kind).or_default().push(ItemId(id));
        }
        favs
    }

    #[test]
    fn source_card_fallbacks() {
        let code: SourceCode = serde_json::from_value(json!({"id": 1})).unwrap();
        let card = source_card(&code, &Favorites::new());

        assert_eq!(card.title, "Untitled");
        assert_eq!(card.description, "No description");
        assert_eq!(card.category, "Uncategorized");
        assert_eq!(card.author, "Unknown");
        assert_eq!(card.date, "N/A");
        assert_eq!(card.thumbnail, PLACEHOLDER_THUMBNAIL);
        assert!(card.demo.is_none());
        assert!(card.download.is_none());
        assert!(!card.favorited);
    }

    #[test]
    fn source_card_derives_zip_link_and_favorite() {
        let code: SourceCode = serde_json::from_value(json!({
            "id": 3,
            "demo": "https://demo.example.com",
            "github_repo": "https://github.com/acme/widget"
        }))
        .unwrap();
        let card = source_card(&code, &favorites(&[(ItemKind::SourceCodes, 3)]));

        assert_eq!(
            card.download.as_deref(),
            Some("https://github.com/acme/widget/archive/refs/heads/main.zip")
        );
        assert_eq!(card.demo.as_deref(), Some("https://demo.example.com"));
        assert!(card.favorited);
        assert_eq!(Card::Source(card).favorite_label(), "Unfavorite");
    }

    #[test]
    fn blog_card_truncates_content_to_excerpt() {
        let cache = loaded_cache();
        let long = blog_card(&cache.blog_posts.items[1], &Favorites::new());
        assert_eq!(long.excerpt.chars().count(), 103);
        assert!(long.excerpt.ends_with("..."));

        let short = blog_card(&cache.blog_posts.items[0], &Favorites::new());
        assert_eq!(short.excerpt, "tiny...");
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let post: BlogPost = serde_json::from_value(json!({"id": 1, "content": "é".repeat(120)})).unwrap();
        let card = blog_card(&post, &Favorites::new());
        assert_eq!(card.excerpt, format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn list_view_first_page_of_twenty() {
        let cache = loaded_cache();
        let view = list_view(&cache, ItemKind::SourceCodes, query(1), &Favorites::new());

        let ids: Vec<u64> = view.cards().iter().map(|c| c.id().0).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
        match &view.body {
            ListBody::Cards { page, total_pages, nav, .. } => {
                assert_eq!((*page, *total_pages), (1, 3));
                assert!(nav.is_some());
            }
            other => panic!("expected cards, got {other:?}"),
        }
        assert_eq!(view.categories, vec!["All", "Even", "Odd"]);
        assert!(view.category_hint().is_none());
    }

    #[test]
    fn list_view_reports_empty_filter_result() {
        let cache = loaded_cache();
        let q = ListQuery { search: "nothing matches", ..query(1) };
        let view = list_view(&cache, ItemKind::SourceCodes, q, &Favorites::new());
        assert_eq!(view.body, ListBody::Empty("No source codes found.".into()));
    }

    #[test]
    fn list_view_shows_loading_then_failure() {
        let mut cache = CollectionCache::new();
        cache.ensure_loaded(ItemKind::BlogPosts);
        let view = list_view(&cache, ItemKind::BlogPosts, query(1), &Favorites::new());
        assert_eq!(view.body, ListBody::Loading);

        let _ = cache.complete(ItemKind::BlogPosts, Ok(json!("not an array")));
        let view = list_view(&cache, ItemKind::BlogPosts, query(1), &Favorites::new());
        assert_eq!(view.body, ListBody::Failed("Failed to load blog posts.".into()));
        assert_eq!(view.categories, vec!["All"]);
        assert_eq!(view.category_hint(), Some(NO_CATEGORIES_HINT));
    }

    #[test]
    fn detail_shows_full_content() {
        let cache = loaded_cache();
        match blog_detail(&cache, Some(ItemId(2)), &Favorites::new()) {
            DetailView::Found(detail) => {
                assert_eq!(detail.content.len(), 150);
                assert_eq!(detail.title, "Untitled");
            }
            DetailView::NotFound => panic!("post 2 is cached"),
        }
    }

    #[test]
    fn detail_miss_is_not_found() {
        let cache = loaded_cache();
        assert_eq!(blog_detail(&cache, Some(ItemId(99)), &Favorites::new()), DetailView::NotFound);
        assert_eq!(blog_detail(&cache, None, &Favorites::new()), DetailView::NotFound);
    }

    #[test]
    fn favorites_skip_uncached_ids() {
        let cache = loaded_cache();
        let favs = favorites(&[
            (ItemKind::BlogPosts, 2),
            (ItemKind::BlogPosts, 404),
            (ItemKind::SourceCodes, 5),
        ]);

        let view = favorites_view(&cache, &favs);
        let shown: Vec<(ItemKind, u64)> = view.cards().iter().map(|c| (c.kind(), c.id().0)).collect();
        assert_eq!(shown, vec![(ItemKind::SourceCodes, 5), (ItemKind::BlogPosts, 2)]);
        assert!(view.cards().iter().all(Card::favorited));
    }

    #[test]
    fn favorites_empty_message() {
        let cache = loaded_cache();
        assert_eq!(
            favorites_view(&cache, &Favorites::new()),
            FavoritesView::Empty(NO_FAVORITES_MESSAGE)
        );
        // Favorites that point only at uncached records render the same way.
        let favs = favorites(&[(ItemKind::BlogPosts, 404)]);
        assert_eq!(favorites_view(&cache, &favs), FavoritesView::Empty(NO_FAVORITES_MESSAGE));
    }
}
