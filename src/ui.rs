//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  The functions below only read the
//! view models built by [`crate::view`]; nothing here decides what is shown.
//!
//! ## For contributors
//!
//! * The layout is a three-row split: navigation bar, section body, and a
//!   one-line status bar.  Collection sections split their body again into
//!   a filter bar, the card list and the page navigation line.
//! * Colours and styles are defined inline.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::cache::LoadStatus;
use crate::paginate::NavEntry;
use crate::section::Section;
use crate::view::{Card, DetailView, FavoritesView, ListBody, ListView};

/// Draw the complete UI for one frame.
///
/// Called once per tick from the main loop.  Delegates to helper functions
/// for each screen region.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [nav_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_nav(app, frame, nav_area);

    match app.section().clone() {
        Section::Home => draw_home(frame, main_area),
        Section::SourceCodes | Section::Blog => {
            if let Some(kind) = app.section().collection() {
                let view = app.list_view(kind);
                draw_list_section(app, &view, frame, main_area);
            }
        }
        Section::Favorites => draw_favorites(app, frame, main_area),
        Section::BlogDetail => draw_detail(app, frame, main_area),
        Section::Other(_) => draw_empty_section(app, frame, main_area),
    }

    draw_status_bar(app, frame, status_area);
}

/// Render the navigation bar, highlighting the active section.
fn draw_nav(app: &App, frame: &mut Frame, area: Rect) {
    let active = app.section().nav_index();
    let mut spans = vec![Span::styled(" YHA-Network ", Style::default().fg(Color::Black).bg(Color::Cyan))];
    for (i, section) in Section::NAV.iter().enumerate() {
        let style = if Some(i) == active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(format!("{} {}", i + 1, section.label()), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_home(frame: &mut Frame, area: Rect) {
    let text = Text::from(vec![
        Line::from(""),
        Line::styled("Welcome to YHA-Network", Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("Browse free source codes and blog posts, and keep your favorites close."),
        Line::from("Press 2 for source codes, 3 for the blog, 4 for your favorites."),
    ]);
    let home = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().title(" Home ").borders(Borders::ALL));
    frame.render_widget(home, area);
}

fn draw_empty_section(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.section().label()))
        .borders(Borders::ALL);
    frame.render_widget(block, area);
}

/// A collection section: filter bar, card list, page navigation.
fn draw_list_section(app: &mut App, view: &ListView, frame: &mut Frame, area: Rect) {
    let [filter_area, list_area, pages_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_filter_bar(app, view, frame, filter_area);

    let title = format!(" {} ", app.section().label());
    match &view.body {
        ListBody::Loading => draw_message(frame, list_area, &title, crate::view::LOADING_MESSAGE, Color::Gray),
        ListBody::Failed(msg) => draw_message(frame, list_area, &title, msg, Color::Red),
        ListBody::Empty(msg) => draw_message(frame, list_area, &title, msg, Color::Gray),
        ListBody::Cards { cards, page, total_pages, nav } => {
            let title = format!("{title}- page {page}/{total_pages} ");
            draw_cards(app, cards, &title, frame, list_area);
            if let Some(nav) = nav {
                draw_page_nav(nav, frame, pages_area);
            }
        }
    }
}

fn draw_filter_bar(app: &App, view: &ListView, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::styled(" Category: ", Style::default().fg(Color::DarkGray))];
    for option in &view.categories {
        let style = if *option == view.category {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {option} "), style));
    }
    if let Some(hint) = view.category_hint() {
        spans.push(Span::styled(format!(" ({hint})"), Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::styled("   Search: ", Style::default().fg(Color::DarkGray)));
    match &app.search_input {
        Some(typing) => spans.push(Span::styled(
            format!("{typing}▏"),
            Style::default().fg(Color::Yellow),
        )),
        None if view.search.is_empty() => {
            spans.push(Span::styled("(press /)", Style::default().fg(Color::DarkGray)))
        }
        None => {
            spans.push(Span::styled(view.search.clone(), Style::default().fg(Color::White)));
            spans.push(Span::styled("  x: clear", Style::default().fg(Color::DarkGray)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let paragraph = Paragraph::new(Text::from(vec![Line::from(""), Line::from(message.to_string())]))
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Render cards as a scrollable, selectable list.
fn draw_cards(app: &mut App, cards: &[Card], title: &str, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = cards.iter().map(card_item).collect();

    let list = List::new(items)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn card_item(card: &Card) -> ListItem<'static> {
    let heart = if card.favorited() {
        Span::styled("♥ ", Style::default().fg(Color::Red))
    } else {
        Span::raw("  ")
    };
    let dim = Style::default().fg(Color::DarkGray);

    let (title, body, category, author, date, actions) = match card {
        Card::Source(c) => {
            let demo = link_span("Demo", c.demo.as_deref());
            let zip = link_span("Download ZIP", c.download.as_deref());
            (&c.title, &c.description, &c.category, &c.author, &c.date, vec![demo, Span::raw("  "), zip])
        }
        Card::Blog(c) => (
            &c.title,
            &c.excerpt,
            &c.category,
            &c.author,
            &c.date,
            vec![Span::styled("Enter: Read More", Style::default().fg(Color::Blue))],
        ),
    };

    let mut footer = vec![Span::raw("    ")];
    footer.extend(actions);
    footer.push(Span::raw("  "));
    footer.push(Span::styled(
        format!("f: {}", card.favorite_label()),
        Style::default().fg(Color::Magenta),
    ));

    ListItem::new(Text::from(vec![
        Line::from(vec![
            heart,
            Span::styled(title.clone(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(format!("[{category}]"), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![Span::raw("    "), Span::raw(body.clone())]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("by {author} · {date}"), dim),
        ]),
        Line::from(footer),
        Line::from(""),
    ]))
}

/// A link control; disabled (dimmed, no target) when absent.
fn link_span(label: &str, url: Option<&str>) -> Span<'static> {
    match url {
        Some(url) => Span::styled(format!("{label}: {url}"), Style::default().fg(Color::Blue)),
        None => Span::styled(
            format!("{label} (unavailable)"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT),
        ),
    }
}

fn draw_page_nav(nav: &[NavEntry], frame: &mut Frame, area: Rect) {
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);

    let spans: Vec<Span> = nav
        .iter()
        .map(|entry| match *entry {
            NavEntry::Previous { enabled: on, .. } => {
                Span::styled(" ‹ Previous ", if on { enabled } else { disabled })
            }
            NavEntry::Next { enabled: on, .. } => {
                Span::styled(" Next › ", if on { enabled } else { disabled })
            }
            NavEntry::Ellipsis => Span::styled(" … ", disabled),
            NavEntry::Page { number, current: true } => Span::styled(
                format!(" {number} "),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ),
            NavEntry::Page { number, current: false } => Span::styled(format!(" {number} "), enabled),
        })
        .collect();

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_favorites(app: &mut App, frame: &mut Frame, area: Rect) {
    match app.favorites_view() {
        FavoritesView::Empty(msg) => draw_message(frame, area, " Favorites ", msg, Color::Gray),
        FavoritesView::Cards(cards) => draw_cards(app, &cards, " Favorites ", frame, area),
    }
}

fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let detail = match app.detail_view() {
        DetailView::Found(detail) => detail,
        DetailView::NotFound => {
            draw_message(frame, area, " Blog Detail ", crate::view::NOT_FOUND_MESSAGE, Color::Gray);
            return;
        }
    };

    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::styled(detail.title.clone(), label.fg(Color::White)),
        Line::styled(detail.thumbnail.clone(), Style::default().fg(Color::DarkGray)),
        Line::from(""),
        Line::from(vec![Span::styled("Category: ", label), Span::raw(detail.category.clone())]),
        Line::from(vec![Span::styled("Author: ", label), Span::raw(detail.author.clone())]),
        Line::from(vec![Span::styled("Date: ", label), Span::raw(detail.date.clone())]),
        Line::from(""),
    ];
    lines.extend(detail.content.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("f: {}", if detail.favorited { "Unfavorite" } else { "Favorite" }),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw("   "),
        Span::styled("b: Back to Blog", Style::default().fg(Color::Blue)),
    ]));

    let paragraph = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" Blog Detail ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
    ];
    if let Some((count, kind)) = app.collection_size() {
        let text = match app.cache.status(kind) {
            LoadStatus::Loading => format!("loading {}…", kind.label()),
            _ => format!("{count} {}", kind.label()),
        };
        spans.push(Span::styled(text, Style::default().fg(Color::Green)));
        spans.push(Span::raw("  "));
    }
    let help = if app.search_input.is_some() {
        "type to search  Enter: done  Esc: clear"
    } else {
        "q: quit  1-4: sections  ↑/↓: select  ←/→: page  H/L: first/last  c: category  /: search  f: favorite"
    };
    spans.push(Span::raw(help));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::app::Command;
    use crate::debounce::SEARCH_DEBOUNCE;
    use crate::fetch::tests::stub_fetcher;
    use crate::fetch::FetchMsg;
    use crate::paginate::PAGE_SIZE;
    use crate::source::ItemKind;
    use crate::store::{MemoryBackend, PreferenceStore};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    fn loaded_app() -> App {
        let mut app = App::new(
            PreferenceStore::new(Box::new(MemoryBackend::new())),
            stub_fetcher(None, None),
            PAGE_SIZE,
            SEARCH_DEBOUNCE,
        );
        let codes: Vec<_> = (0..12)
            .map(|i| json!({"id": i, "title": format!("Project {i}"), "category": "Web", "github_repo": "https://github.com/acme/p"}))
            .collect();
        app.apply_fetch(FetchMsg { kind: ItemKind::SourceCodes, result: Ok(json!(codes)) });
        app.apply_fetch(FetchMsg {
            kind: ItemKind::BlogPosts,
            result: Ok(json!([{"id": 42, "title": "Async Rust", "content": "Futures\nand executors"}])),
        });
        app
    }

    fn render(app: &mut App) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol().chars().next().unwrap_or(' ')).collect()
    }

    #[test]
    fn home_renders_welcome() {
        let mut app = loaded_app();
        assert!(render(&mut app).contains("Welcome to YHA-Network"));
    }

    #[test]
    fn source_codes_render_cards_and_page_nav() {
        let mut app = loaded_app();
        app.activate(Section::SourceCodes);
        let text = render(&mut app);

        assert!(text.contains("Project 0"));
        assert!(!text.contains("Project 8"), "second page is not drawn");
        assert!(text.contains("page 1/2"));
        assert!(text.contains("Next"));
        assert!(text.contains("12 source codes"));
    }

    #[test]
    fn loading_and_failure_messages() {
        let mut app = App::new(
            PreferenceStore::new(Box::new(MemoryBackend::new())),
            stub_fetcher(None, None),
            PAGE_SIZE,
            SEARCH_DEBOUNCE,
        );
        app.activate(Section::Blog);
        assert!(render(&mut app).contains("Loading..."));

        app.apply_fetch(FetchMsg { kind: ItemKind::BlogPosts, result: Ok(json!("nope")) });
        let text = render(&mut app);
        assert!(text.contains("Failed to load blog posts."));
        assert!(text.contains("No categories available"));
    }

    #[test]
    fn detail_renders_full_content() {
        let mut app = loaded_app();
        app.activate(Section::Blog);
        app.dispatch(Command::OpenSelected, Instant::now());
        let text = render(&mut app);

        assert!(text.contains("Async Rust"));
        assert!(text.contains("and executors"));
        assert!(text.contains("Back to Blog"));
    }

    #[test]
    fn detail_not_found() {
        let mut app = loaded_app();
        app.show_detail(7_u64);
        assert!(render(&mut app).contains("Blog post not found."));
    }

    #[test]
    fn favorites_empty_and_filled() {
        let mut app = loaded_app();
        app.activate(Section::Favorites);
        assert!(render(&mut app).contains("No favorites added yet."));

        app.activate(Section::Blog);
        app.dispatch(Command::ToggleFavorite, Instant::now());
        app.activate(Section::Favorites);
        let text = render(&mut app);
        assert!(text.contains("Async Rust"));
        assert!(text.contains("Unfavorite"));
    }

    #[test]
    fn unknown_section_draws_without_panic() {
        let mut app = loaded_app();
        app.activate(Section::parse("about"));
        assert!(render(&mut app).contains("About"));
    }
}
