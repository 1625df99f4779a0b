//! TUI rendering logic for the browser.

use std::time::Instant;

use nomflix_api::image::ImageResolver;
use nomflix_core::carousel::page_window;
use nomflix_core::catalog::CatalogItem;
use nomflix_core::overlay::OverlayState;
use nomflix_core::section::{RowId, Section};
use nomflix_core::slide::SlideFrame;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::state::{BrowserState, InputMode};

/// Height of one search grid card.
const GRID_CARD_HEIGHT: u16 = 5;

/// Image URLs shown in the banner and detail card.
#[derive(Debug, Clone)]
pub struct Artwork {
    resolver: ImageResolver,
    detail_size: String,
}

impl Artwork {
    /// Creates artwork settings.
    pub fn new(resolver: ImageResolver, detail_size: impl Into<String>) -> Self {
        Self {
            resolver,
            detail_size: detail_size.into(),
        }
    }

    fn detail_url(&self, path: &str) -> String {
        self.resolver.url(path, Some(&self.detail_size))
    }
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState, artwork: &Artwork, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // section body
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_footer(frame, chunks[2], state);

    state.card_areas.clear();
    if state.is_loading() {
        let loading = Paragraph::new("Loading...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, chunks[1]);
        return;
    }

    match state.section() {
        Section::Search => draw_search_grid(frame, chunks[1], state),
        Section::Movies | Section::Tv => draw_rows_view(frame, chunks[1], state, artwork, now),
    }

    if let OverlayState::Open { layout_key, .. } = state.overlay() {
        draw_overlay(frame, state, artwork, &layout_key, now);
    }
}

/// Draws the logo, section tabs and search input.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let mut spans = vec![Span::styled(
        " NOMFLIX ",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )];
    for (key, section) in [('1', Section::Movies), ('2', Section::Tv)] {
        let style = if state.section() == section {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("  [{key}] {}", section.label()), style));
    }
    let tabs = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(tabs, header_chunks[0]);

    let (search_text, search_style) = if state.input_mode == InputMode::Search {
        (state.search_input.clone(), Style::default().fg(Color::Yellow))
    } else {
        (
            state.route().keyword.clone().unwrap_or_default(),
            Style::default(),
        )
    };
    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[1]);
}

/// Draws the banner and the section rows.
#[allow(clippy::indexing_slicing)]
fn draw_rows_view(
    frame: &mut Frame,
    area: Rect,
    state: &mut BrowserState,
    artwork: &Artwork,
    now: Instant,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    if let Some(banner) = state.banner() {
        let mut lines = vec![Line::from(banner.overview)];
        if let Some(path) = &banner.backdrop_path {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                artwork.detail_url(path),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    format!(" {} ", banner.title),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        );
        frame.render_widget(paragraph, chunks[0]);
    }

    let rows = state.section().rows();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Fill(1); rows.len()])
        .split(chunks[1]);

    let mut card_areas = Vec::new();
    for (index, (&row, &row_area)) in rows.iter().zip(row_areas.iter()).enumerate() {
        card_areas.extend(draw_row(frame, row_area, state, row, index, now));
    }
    state.card_areas.extend(card_areas);
}

/// Draws one carousel row. Returns the areas of fully visible cards.
fn draw_row(
    frame: &mut Frame,
    area: Rect,
    state: &BrowserState,
    row: RowId,
    index: usize,
    now: Instant,
) -> Vec<(String, Rect)> {
    let is_focused = state.focus_row == index && state.input_mode == InputMode::Normal;
    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", row.title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let offset = state.offset();
    let focused_card = is_focused.then_some(state.focus_card);
    let visible = state.visible(row);

    if let Some((from_page, progress)) = state.slide(row, now) {
        let slide = SlideFrame::at(progress, inner.width);
        let outgoing = page_window(state.row_items(row), offset, from_page);
        draw_cards(frame, inner, offset, outgoing, slide.outgoing, None);
        draw_cards(frame, inner, offset, visible, slide.incoming, focused_card)
    } else {
        draw_cards(frame, inner, offset, visible, 0, focused_card)
    }
}

/// Lays out `items` as `offset` equal columns shifted by `dx`, clipped to `bounds`.
fn draw_cards(
    frame: &mut Frame,
    bounds: Rect,
    offset: usize,
    items: &[CatalogItem],
    dx: i32,
    focused: Option<usize>,
) -> Vec<(String, Rect)> {
    let columns = u16::try_from(offset).unwrap_or(u16::MAX);
    let card_width = bounds.width.checked_div(columns).unwrap_or(0);
    let mut areas = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let Ok(column) = u16::try_from(i) else {
            break;
        };
        let x = i32::from(bounds.x)
            .saturating_add(i32::from(card_width.saturating_mul(column)))
            .saturating_add(dx);
        let Some(card) = clip_horizontal(x, card_width, bounds) else {
            continue;
        };
        draw_card(frame, card, item, focused == Some(i));
        if dx == 0 {
            areas.push((item.layout_key(), card));
        }
    }
    areas
}

/// Horizontal span `[x, x + width)` intersected with `bounds`.
fn clip_horizontal(x: i32, width: u16, bounds: Rect) -> Option<Rect> {
    let left = x.max(i32::from(bounds.x));
    let right = x
        .saturating_add(i32::from(width))
        .min(i32::from(bounds.right()));
    if right <= left {
        return None;
    }
    let left = u16::try_from(left).ok()?;
    let right = u16::try_from(right).ok()?;
    Some(Rect::new(
        left,
        bounds.y,
        right.saturating_sub(left),
        bounds.height,
    ))
}

/// Draws one catalog card.
fn draw_card(frame: &mut Frame, area: Rect, item: &CatalogItem, is_focused: bool) {
    let border_style = if is_focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut lines = vec![Line::from(Span::styled(
        item.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if item.backdrop_path.is_none() {
        lines.push(Line::from(Span::styled(
            "no image",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}

/// Draws the search results grid, scrolled to keep the focused card visible.
#[allow(clippy::arithmetic_side_effects)]
fn draw_search_grid(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let keyword = state.route().keyword.clone().unwrap_or_default();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Results for \"{keyword}\" "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = state.offset().max(1);
    let lines_fit = usize::from((inner.height / GRID_CARD_HEIGHT).max(1));
    let focus_line = state.focus_card / columns;
    let first_line = focus_line.saturating_sub(lines_fit - 1);
    let card_width = inner
        .width
        .checked_div(u16::try_from(columns).unwrap_or(u16::MAX))
        .unwrap_or(0);

    let mut card_areas = Vec::new();
    let results = state.search_results();
    for (i, item) in results
        .iter()
        .enumerate()
        .skip(first_line * columns)
        .take(lines_fit * columns)
    {
        let (Ok(line), Ok(column)) = (
            u16::try_from(i / columns - first_line),
            u16::try_from(i % columns),
        ) else {
            break;
        };
        let card = Rect::new(
            inner.x + card_width.saturating_mul(column),
            inner.y + GRID_CARD_HEIGHT.saturating_mul(line),
            card_width,
            GRID_CARD_HEIGHT.min(inner.height),
        )
        .intersection(inner);
        draw_card(
            frame,
            card,
            item,
            state.focus_card == i && state.input_mode == InputMode::Normal,
        );
        card_areas.push((item.layout_key(), card));
    }
    state.card_areas.extend(card_areas);
}

/// Draws the detail overlay, morphing from the selected card's area.
fn draw_overlay(
    frame: &mut Frame,
    state: &BrowserState,
    artwork: &Artwork,
    layout_key: &str,
    now: Instant,
) {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::default().add_modifier(Modifier::DIM));

    let target = centered_rect(50, 80, area);
    let origin = state.card_areas.get(layout_key).copied().unwrap_or(target);
    let popup = lerp_rect(origin, target, state.overlay_progress(now));

    let lines = state
        .selected_item()
        .map(|item| detail_lines(item, artwork))
        .unwrap_or_default();
    let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(detail, popup);
}

/// Detail card content.
fn detail_lines<'a>(item: &'a CatalogItem, artwork: &Artwork) -> Vec<Line<'a>> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut lines = vec![
        Line::from(Span::styled(
            item.title.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(item.media_kind.as_str(), dim)),
        Line::from(""),
        Line::from(item.overview.as_str()),
        Line::from(""),
    ];
    if let Some(path) = &item.backdrop_path {
        lines.push(Line::from(Span::styled(artwork.detail_url(path), dim)));
    }
    lines.push(Line::from(Span::styled(item.site_url(), dim)));
    lines
}

/// Linear interpolation between two rectangles at `t` in `0.0..=1.0`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn lerp_rect(from: Rect, to: Rect, t: f64) -> Rect {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u16, b: u16| -> u16 {
        let a = f64::from(a);
        let b = f64::from(b);
        (b - a).mul_add(t, a).round() as u16
    };
    Rect::new(
        lerp(from.x, to.x),
        lerp(from.y, to.y),
        lerp(from.width, to.width),
        lerp(from.height, to.height),
    )
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`.
#[allow(clippy::indexing_slicing)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_y),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_x),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = if state.input_mode == InputMode::Search {
        "Type a keyword | Enter: search | Esc: cancel"
    } else if state.overlay().is_open() {
        "Esc/Backspace: close  f: forward  o: open TMDB page  q: quit"
    } else {
        "\u{2190}\u{2192}/h/l: card  \u{2191}\u{2193}/k/j: row  Space/]: next page  Enter: detail  Esc: back  f: forward  1/2: section  /: search  o: TMDB  q: quit"
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_clip_horizontal_cuts_card_at_edges() {
        // Arrange
        let bounds = Rect::new(10, 2, 60, 5);

        // Act
        let left_edge = clip_horizontal(5, 10, bounds).unwrap();
        let right_edge = clip_horizontal(65, 10, bounds).unwrap();
        let outside = clip_horizontal(-40, 10, bounds);

        // Assert
        assert_eq!(left_edge, Rect::new(10, 2, 5, 5));
        assert_eq!(right_edge, Rect::new(65, 2, 5, 5));
        assert!(outside.is_none());
    }

    #[test]
    fn test_lerp_rect_endpoints() {
        // Arrange
        let from = Rect::new(0, 10, 10, 4);
        let to = Rect::new(20, 2, 40, 20);

        // Act & Assert
        assert_eq!(lerp_rect(from, to, 0.0), from);
        assert_eq!(lerp_rect(from, to, 1.0), to);
        assert_eq!(lerp_rect(from, to, 0.5), Rect::new(10, 6, 25, 12));
    }

    #[test]
    fn test_centered_rect_is_inside_area() {
        // Arrange
        let area = Rect::new(0, 0, 100, 50);

        // Act
        let popup = centered_rect(50, 80, area);

        // Assert
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 40);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 5);
    }
}
