//! Ratatui adapter for the catalog display model.
//!
//! This module is purely presentational -- it takes references to the
//! application state and draws into a Ratatui `Frame`.  It does **not** own
//! any state.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::contact::{ContactForm, Field};
use crate::controller::{AppState, LoadIndicator};
use crate::nav::Section;
use crate::theme::Palette;
use crate::view::{Card, DisplayModel};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lines per card, including the blank separator.
const CARD_HEIGHT: u16 = 4;

const ABOUT_TEXT: &str = "Hand-picked products from around the web. \
Every card links to the seller; purchases made through these links may earn a commission.";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Index of the first card to draw so that `selected` stays on screen.
pub fn first_visible_card(selected: usize, viewport_height: u16) -> usize {
    let per_page = (viewport_height / CARD_HEIGHT).max(1) as usize;
    selected.saturating_sub(per_page - 1)
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

fn render_header(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let theme = state.theme.current();

    let title_line = Line::from(vec![
        Span::styled(
            " Catalog ",
            Style::default()
                .fg(palette.background)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            "Product Browser",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {} (t)", theme.toggle_icon()),
            Style::default().fg(palette.text),
        ),
    ]);

    let nav_line = if state.nav.is_expanded() {
        let mut spans = vec![Span::raw(" ")];
        for (i, section) in Section::ALL.iter().enumerate() {
            let style = if *section == state.section {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(palette.text)
            };
            spans.push(Span::styled(format!("{} ", i + 1), Style::default().fg(palette.muted)));
            spans.push(Span::styled(section.label(), style));
            spans.push(Span::raw("   "));
        }
        Line::from(spans)
    } else {
        Line::from(vec![Span::styled(
            " \u{2630} Menu (m)",
            Style::default().fg(palette.muted),
        )])
    };

    let text = Text::from(vec![title_line, nav_line]);
    frame.render_widget(Paragraph::new(text), area);
}

// ---------------------------------------------------------------------------
// Products section
// ---------------------------------------------------------------------------

fn render_category_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    palette: &Palette,
) {
    let mut spans = vec![Span::styled(" ", Style::default())];
    for category in &state.categories {
        let style = if *category == state.filter.active_category {
            Style::default()
                .fg(palette.background)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        spans.push(Span::styled(format!(" {} ", category), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(" \u{2190}/\u{2192}", Style::default().fg(palette.muted)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search_bar(
    frame: &mut Frame,
    area: Rect,
    query: &str,
    search_active: bool,
    palette: &Palette,
) {
    let line = if search_active {
        Line::from(vec![
            Span::styled(
                " / ",
                Style::default()
                    .fg(palette.background)
                    .bg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", query), Style::default().fg(palette.text)),
            Span::styled(
                "_",
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled("  (Enter to finish)", Style::default().fg(palette.muted)),
        ])
    } else if !query.is_empty() {
        Line::from(vec![
            Span::styled(" Search: ", Style::default().fg(palette.muted)),
            Span::styled(
                format!("\"{}\"", query),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (/ to edit)", Style::default().fg(palette.muted)),
        ])
    } else {
        Line::from(vec![Span::styled(
            " Search products... (/)",
            Style::default().fg(palette.muted),
        )])
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn card_lines(
    card: &Card,
    width: usize,
    selected: bool,
    entering: bool,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let mut base = Style::default().fg(palette.text);
    if selected {
        base = base.bg(palette.highlight);
    }
    if entering {
        base = base.add_modifier(Modifier::DIM);
    }
    let marker = if selected { "\u{25B6} " } else { "  " };

    let header = Line::from(vec![
        Span::styled(marker.to_string(), base.fg(palette.accent)),
        Span::styled(
            format!("[{}] ", card.category),
            base.fg(palette.muted),
        ),
        Span::styled(
            truncate(&card.name, width.saturating_sub(card.category.width() + 5)),
            base.add_modifier(Modifier::BOLD),
        ),
    ]);
    let description = Line::from(Span::styled(
        format!("  {}", truncate(&card.description, width.saturating_sub(2))),
        base,
    ));
    let footer = Line::from(vec![
        Span::styled(
            format!("  {}", card.price),
            base.fg(palette.price).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "  {}{} ",
                card.link.label,
                if card.link.new_context { " \u{2197}" } else { "" }
            ),
            base.fg(palette.accent),
        ),
        Span::styled(
            truncate(
                &format!("img: {}", card.image),
                width.saturating_sub(card.price.width() + card.link.label.width() + 8),
            ),
            base.fg(palette.muted),
        ),
    ]);

    vec![header, description, footer, Line::raw("")]
}

fn render_products(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    entering: bool,
    palette: &Palette,
) {
    let lines: Vec<Line<'static>> = match (&state.indicator, &state.display) {
        // Stays up until the load resolves, whatever was rendered meanwhile.
        (LoadIndicator::Loading, _) => vec![Line::from(Span::styled(
            " Loading products...",
            Style::default().fg(palette.muted),
        ))],
        (LoadIndicator::Failed(message), _) => vec![Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(ratatui::style::Color::Red),
        ))],
        (_, Some(DisplayModel::Placeholder(text))) => vec![Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(palette.muted),
        ))],
        (_, Some(DisplayModel::Cards(cards))) => {
            let width = area.width as usize;
            let first = first_visible_card(state.selected, area.height);
            cards
                .iter()
                .enumerate()
                .skip(first)
                .take((area.height / CARD_HEIGHT).max(1) as usize)
                .flat_map(|(i, card)| {
                    card_lines(card, width, i == state.selected, entering, palette)
                })
                .collect()
        }
        (_, None) => Vec::new(),
    };
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

// ---------------------------------------------------------------------------
// About / contact sections
// ---------------------------------------------------------------------------

fn render_about(frame: &mut Frame, area: Rect, state: &AppState, palette: &Palette) {
    let count = state.repository.current().len();
    let categories = state.categories.len().saturating_sub(1);
    let summary = if state.repository.is_loaded() {
        format!(" {} products in {} categories", count, categories)
    } else {
        " Catalog not loaded yet".to_string()
    };
    let text = Text::from(vec![
        Line::from(Span::styled(
            " About",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(format!(" {}", ABOUT_TEXT), Style::default().fg(palette.text))),
        Line::raw(""),
        Line::from(Span::styled(summary, Style::default().fg(palette.muted))),
    ]);
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
}

fn render_contact(frame: &mut Frame, area: Rect, form: &ContactForm, palette: &Palette) {
    let mut lines = vec![
        Line::from(Span::styled(
            " Contact",
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for field in Field::ALL {
        let focused = field == form.focus;
        let label_style = if focused {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        let mut spans = vec![
            Span::styled(format!(" {:<8}", field.label()), label_style),
            Span::styled(form.value(field).to_string(), Style::default().fg(palette.text)),
        ];
        if focused {
            spans.push(Span::styled(
                "_",
                Style::default().fg(palette.text).add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        " Tab next field  Enter send  Esc back",
        Style::default().fg(palette.muted),
    )));
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

fn render_legend(frame: &mut Frame, area: Rect, status: Option<&str>, palette: &Palette) {
    let mut spans = vec![Span::styled(
        " q quit  / search  \u{2190}/\u{2192} category  j/k select  o open  t theme  m menu",
        Style::default().fg(palette.muted),
    )];
    if let Some(status) = status {
        spans.push(Span::styled(
            format!("  [{}]", status),
            Style::default().fg(palette.accent),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Main render entry point
// ---------------------------------------------------------------------------

/// Top-level render function.  `entering` draws freshly rendered cards in
/// their faded entrance style.
pub fn render_ui(
    frame: &mut Frame,
    state: &AppState,
    search_active: bool,
    entering: bool,
    status: Option<&str>,
) {
    let palette = state.theme.current().palette();
    let size = frame.area();

    frame.render_widget(
        Block::default()
            .borders(Borders::NONE)
            .style(Style::default().bg(palette.background).fg(palette.text)),
        size,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header + nav
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // section body
            Constraint::Length(1), // legend
        ])
        .split(size);

    render_header(frame, chunks[0], state, &palette);

    match state.section {
        Section::Products => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // categories
                    Constraint::Length(1), // search
                    Constraint::Length(1), // spacer
                    Constraint::Min(1),    // cards
                ])
                .split(chunks[2]);
            render_category_bar(frame, body[0], state, &palette);
            render_search_bar(frame, body[1], &state.filter.search_query, search_active, &palette);
            render_products(frame, body[3], state, entering, &palette);
        }
        Section::About => render_about(frame, chunks[2], state, &palette),
        Section::Contact => render_contact(frame, chunks[2], &state.contact, &palette),
    }

    render_legend(frame, chunks[3], status, &palette);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
