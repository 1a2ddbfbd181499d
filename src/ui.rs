use crate::app::{App, MapIcon};
use crate::hotel::{
    amenity_icon, ClusterBand, Listing, MarkerVisual, PriceRange, PriceTier, MARKER_GLYPH,
    MIN_RATING_CEILING, MIN_RATING_FLOOR,
};
use crate::map::BaseMap;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

const SIDE_PANEL_WIDTH: u16 = 32;
const HEADER_HEIGHT: u16 = 2;
const RATING_BAR_WIDTH: usize = 20;
/// Amenities listed on a card
const MAX_AMENITIES: usize = 8;

struct Areas {
    header: Rect,
    map: Rect,
    panel: Rect,
    status: Rect,
}

fn split(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),    // Map and panel
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(rows[1]);

    Areas {
        header: rows[0],
        map: body[0],
        panel: body[1],
        status: rows[2],
    }
}

fn map_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Seattle ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

/// Terminal cells the map is drawn into, for a given frame area
pub fn map_inner(area: Rect) -> Rect {
    map_block().inner(split(area).map)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if !app.is_ready() {
        render_loading(frame, area);
        return;
    }

    let areas = split(area);
    render_header(frame, app, areas.header);
    render_map(frame, app, areas.map);
    render_panel(frame, app, areas.panel);
    render_status_bar(frame, app, areas.status);

    if let Some(listing) = app.selected() {
        let inner = map_block().inner(areas.map);
        render_card(frame, app, listing, inner);
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "⠋ Loading Seattle Hotels",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Preparing your hotel discovery experience...",
            Style::default().fg(Color::Gray),
        )),
    ];
    let height = lines.len() as u16;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect::new(area.x, y, area.width, height.min(area.height));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = vec![
        Line::from(Span::styled(
            " Seattle Hotel Discovery",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            " Find the perfect hotel for your conference stay • With Smart Clustering",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(title), area);

    let stats = vec![
        Line::from(Span::styled(
            format!("{} hotels found ", app.visible_count()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Downtown Seattle ({} total) ", app.total_count()),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(stats).alignment(Alignment::Right), area);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = map_block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let base = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &app.viewport);

    let map_widget = MapWidget {
        base,
        icons: app.icons(),
        selected: app.popup().map(|p| p.listings[p.current]),
    };
    frame.render_widget(map_widget, inner);
}

/// Custom widget that renders the braille base map with hotel icons overlaid
struct MapWidget {
    base: BaseMap,
    icons: Vec<MapIcon>,
    selected: Option<usize>,
}

impl MapWidget {
    fn render_layer(canvas: &crate::braille::BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        let rows = canvas.height().min(area.height as usize);
        let cols = canvas.width().min(area.width as usize);
        for row in 0..rows {
            for col in 0..cols {
                if let Some(ch) = canvas.glyph(col, row) {
                    let cell = (area.x + col as u16, area.y + row as u16);
                    buf[cell].set_char(ch).set_fg(color);
                }
            }
        }
    }

    /// Write `text` centered on a cell, clipped to the area
    fn put_centered(text: &str, cx: i32, cy: i32, style: Style, area: Rect, buf: &mut Buffer) {
        if cy < 0 || cy >= area.height as i32 {
            return;
        }
        let len = text.chars().count() as i32;
        let start = cx - len / 2;
        for (i, ch) in text.chars().enumerate() {
            let x = start + i as i32;
            if x >= 0 && x < area.width as i32 {
                buf[(area.x + x as u16, area.y + cy as u16)]
                    .set_char(ch)
                    .set_style(style);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.base.detail, Color::DarkGray, area, buf);
        Self::render_layer(&self.base.shoreline, Color::Blue, area, buf);

        // Singles first so cluster badges stay readable when they overlap
        let (clusters, singles): (Vec<_>, Vec<_>) = self
            .icons
            .iter()
            .partition(|icon| matches!(icon, MapIcon::Cluster { .. }));

        for icon in singles.into_iter().chain(clusters) {
            let p = icon.position();
            let (cx, cy) = ((p.x / 2.0).floor() as i32, (p.y / 4.0).floor() as i32);
            match icon {
                MapIcon::Single { listing, visual, .. } => {
                    let selected = self.selected == Some(*listing);
                    let glyph = if selected { '◉' } else { MARKER_GLYPH };
                    let mut style = Style::default().fg(visual.color);
                    if selected {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    Self::put_centered(&glyph.to_string(), cx, cy, style, area, buf);
                }
                MapIcon::Cluster { visual, .. } => {
                    let style = Style::default()
                        .fg(Color::White)
                        .bg(visual.color)
                        .add_modifier(Modifier::BOLD);
                    Self::put_centered(&visual.badge(), cx, cy, style, area, buf);
                }
            }
        }
    }
}

fn render_panel(frame: &mut Frame, app: &App, area: Rect) {
    let filters = app.filters();
    let heading = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines = vec![Line::from(Span::styled("Price Range", heading))];
    for (i, range) in PriceRange::OPTIONS.iter().enumerate() {
        let active = filters.price_range == *range;
        let dot_color = match range {
            PriceRange::All => Color::White,
            PriceRange::Budget => MarkerVisual::for_tier(Some(PriceTier::Budget)).color,
            PriceRange::Mid => MarkerVisual::for_tier(Some(PriceTier::Mid)).color,
            PriceRange::Luxury => MarkerVisual::for_tier(Some(PriceTier::Luxury)).color,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", i + 1), dim),
            Span::styled(if active { "(•) " } else { "( ) " }, Style::default().fg(dot_color)),
            Span::styled(
                range.label(),
                if active { Style::default().fg(Color::White) } else { dim },
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Minimum Rating: {:.1}", filters.min_rating),
        heading,
    )));
    lines.push(rating_bar(filters.min_rating));
    lines.push(Line::from(Span::styled(
        format!("{MIN_RATING_FLOOR:.1}  [ / ]  {MIN_RATING_CEILING:.1}"),
        dim,
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Hotel Prices", heading)));
    for tier in PriceTier::ALL {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{MARKER_GLYPH} "),
                Style::default().fg(MarkerVisual::for_tier(Some(tier)).color),
            ),
            Span::raw(format!("{} ({})", tier.label(), tier.range_text())),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Clusters: numbers show hotel count", dim)));
    for band in [ClusterBand::Small, ClusterBand::Medium, ClusterBand::Large] {
        lines.push(Line::from(vec![
            Span::styled("  ", Style::default().bg(band.color())),
            Span::raw(format!(" {}", band.description())),
        ]));
    }
    lines.push(Line::from(Span::styled("Click clusters to zoom in", dim)));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Filter Hotels ", heading));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Slider rendering of the minimum rating within 7.0..=9.5
fn rating_bar(min_rating: f64) -> Line<'static> {
    let span = MIN_RATING_CEILING - MIN_RATING_FLOOR;
    let frac = ((min_rating - MIN_RATING_FLOOR) / span).clamp(0.0, 1.0);
    let filled = (frac * RATING_BAR_WIDTH as f64).round() as usize;
    Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(Color::Yellow)),
        Span::styled("●", Style::default().fg(Color::White)),
        Span::styled(
            "─".repeat(RATING_BAR_WIDTH - filled),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

/// Five-star rendering of a 10-point guest rating value, matching the card:
/// stars below the integer part and a following half star are lit
fn guest_rating_stars(rating: f64) -> Line<'static> {
    let full = rating.floor().max(0.0) as usize;
    let half = rating.fract() >= 0.5;
    let mut spans: Vec<Span> = (0..5)
        .map(|i| {
            let lit = i < full || (i == full && half);
            Span::styled(
                "★",
                Style::default().fg(if lit { Color::Yellow } else { Color::DarkGray }),
            )
        })
        .collect();
    spans.push(Span::styled(format!(" {rating}"), Style::default().fg(Color::White)));
    Line::from(spans)
}

fn tier_badge(listing: &Listing) -> Span<'static> {
    match PriceTier::classify(listing.price) {
        Some(tier) => Span::styled(
            format!(" {} ", tier.label()),
            Style::default()
                .fg(Color::White)
                .bg(MarkerVisual::for_tier(Some(tier)).color)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(" Price unavailable ", Style::default().fg(Color::Gray)),
    }
}

fn render_card(frame: &mut Frame, app: &App, listing: &Listing, map: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let price = if listing.has_valid_price() {
        format!("${}", listing.price)
    } else {
        "$—".to_string()
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "★".repeat(listing.stars as usize),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(format!("📍 {}", listing.address)),
        Line::from(vec![
            Span::raw("💰 "),
            Span::styled(price, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("/night ", dim),
            tier_badge(listing),
        ]),
        guest_rating_stars(listing.rating),
        Line::from(vec![
            Span::styled(listing.room_type.clone(), Style::default().fg(Color::Cyan)),
            Span::styled(format!("  👥 {} reviews", listing.review_count), dim),
        ]),
    ];

    if let Some(url) = listing.image() {
        lines.push(Line::from(Span::styled(format!("🖼 {url}"), dim)));
    }

    if !listing.amenities.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Amenities",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for amenity in listing.amenities.iter().take(MAX_AMENITIES) {
            lines.push(Line::from(format!("{} {}", amenity_icon(amenity), amenity)));
        }
    }

    let mut footer = String::from("Esc: close");
    if let Some(popup) = app.popup().filter(|p| p.listings.len() > 1) {
        footer = format!("{} of {}  n/N: next/prev  {footer}", popup.current + 1, popup.listings.len());
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(footer, dim)));

    let width = 48.min(map.width);
    let height = (lines.len() as u16 + 2).min(map.height);
    let rect = Rect::new(
        map.x + (map.width - width) / 2,
        map.y + (map.height - height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", listing.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        rect,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | 1-4:price p:cycle [/]:rating hjkl:pan +/-:zoom click:details d:streets r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_inner_excludes_chrome() {
        let inner = map_inner(Rect::new(0, 0, 120, 40));
        assert_eq!(inner.x, 1);
        assert_eq!(inner.y, HEADER_HEIGHT + 1);
        assert_eq!(inner.width, 120 - SIDE_PANEL_WIDTH - 2);
        assert_eq!(inner.height, 40 - HEADER_HEIGHT - 1 - 2);
    }

    #[test]
    fn test_rating_bar_ends() {
        let width = |line: Line| line.spans.iter().map(|s| s.content.chars().count()).sum::<usize>();
        assert_eq!(width(rating_bar(7.0)), RATING_BAR_WIDTH + 1);
        assert_eq!(rating_bar(9.5).spans[0].content.chars().count(), RATING_BAR_WIDTH);
        assert_eq!(rating_bar(7.0).spans[0].content.chars().count(), 0);
    }

    #[test]
    fn test_guest_rating_half_star() {
        let lit = |line: &Line| {
            line.spans[..5]
                .iter()
                .filter(|s| s.style.fg == Some(Color::Yellow))
                .count()
        };
        assert_eq!(lit(&guest_rating_stars(3.5)), 4);
        assert_eq!(lit(&guest_rating_stars(3.4)), 3);
        assert_eq!(lit(&guest_rating_stars(8.7)), 5);
    }
}
