use glam::DVec2;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::hotel::{
    visible_indices, ClusterVisual, FilterState, Listing, MarkerVisual, PriceRange,
};
use crate::map::{Clusterer, GreedyClusterer, MapRenderer, Viewport, MAX_ZOOM};

/// Initial map center (downtown Seattle)
pub const HOME_LON: f64 = -122.33582;
pub const HOME_LAT: f64 = 47.61322;
pub const HOME_ZOOM: f64 = 13.0;

/// How close (in braille pixels) a click must land to pick an icon
const HIT_RADIUS: f64 = 6.0;
/// Margin kept around a cluster when zooming to its bounds
const FIT_PADDING: f64 = 8.0;

/// Startup state machine: one transition, Loading -> Ready
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// A visible listing with its marker visual
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Index into `App::listings`
    pub listing: usize,
    pub visual: MarkerVisual,
}

/// Something drawn on the map at a screen position (braille pixels)
#[derive(Clone, Debug, PartialEq)]
pub enum MapIcon {
    Single {
        listing: usize,
        visual: MarkerVisual,
        at: DVec2,
    },
    Cluster {
        listings: Vec<usize>,
        visual: ClusterVisual,
        at: DVec2,
    },
}

impl MapIcon {
    pub fn position(&self) -> DVec2 {
        match self {
            MapIcon::Single { at, .. } | MapIcon::Cluster { at, .. } => *at,
        }
    }
}

/// Detail popup over one or more listings (several when opened from a cluster)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Popup {
    pub listings: Vec<usize>,
    pub current: usize,
}

/// Application state
pub struct App {
    pub listings: Vec<Listing>,
    filters: FilterState,
    visible: Vec<usize>,
    markers: Vec<Marker>,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    clusterer: Box<dyn Clusterer>,
    pub cluster_radius: f64,
    phase: Phase,
    ready_at: Instant,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Top-left terminal cell of the map area
    map_origin: (u16, u16),
    popup: Option<Popup>,
}

impl App {
    pub fn new(
        listings: Vec<Listing>,
        map_area: Rect,
        cluster_radius: f64,
        loading_delay: Duration,
        now: Instant,
    ) -> Self {
        let mut app = Self {
            listings,
            filters: FilterState::default(),
            visible: Vec::new(),
            markers: Vec::new(),
            viewport: Viewport::new(HOME_LON, HOME_LAT, HOME_ZOOM, 0, 0),
            map_renderer: MapRenderer::new(),
            clusterer: Box::new(GreedyClusterer),
            cluster_radius,
            phase: Phase::Loading,
            ready_at: now + loading_delay,
            should_quit: false,
            last_mouse: None,
            map_origin: (0, 0),
            popup: None,
        };
        app.resize(map_area);
        app.recompute();
        app
    }

    /// Swap the clustering strategy
    pub fn with_clusterer(mut self, clusterer: impl Clusterer + 'static) -> Self {
        self.clusterer = Box::new(clusterer);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    /// Fire the Loading -> Ready transition once the startup delay has passed
    pub fn tick(&mut self, now: Instant) {
        if self.phase == Phase::Loading && now >= self.ready_at {
            self.phase = Phase::Ready;
            info!(total = self.listings.len(), "map ready");
        }
    }

    pub fn filters(&self) -> FilterState {
        self.filters
    }

    /// Replace the filter state and recompute everything derived from it
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute();
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.set_filters(self.filters.with_price_range(range));
    }

    pub fn cycle_price_range(&mut self) {
        self.set_filters(self.filters.with_price_range(self.filters.price_range.next()));
    }

    /// Move the minimum rating by `steps` slider increments
    pub fn nudge_rating(&mut self, steps: i32) {
        self.set_filters(self.filters.nudge_rating(steps));
    }

    fn recompute(&mut self) {
        self.visible = visible_indices(&self.listings, &self.filters);
        self.markers = self
            .visible
            .iter()
            .map(|&idx| Marker {
                listing: idx,
                visual: MarkerVisual::for_price(self.listings[idx].price),
            })
            .collect();

        // Drop popup entries that were filtered out
        if let Some(popup) = &mut self.popup {
            let shown = popup.listings[popup.current];
            popup.listings.retain(|idx| self.visible.contains(idx));
            popup.current = popup.listings.iter().position(|&i| i == shown).unwrap_or(0);
            if popup.listings.is_empty() {
                self.popup = None;
            }
        }

        debug!(
            price_range = ?self.filters.price_range,
            min_rating = self.filters.min_rating,
            visible = self.visible.len(),
            total = self.listings.len(),
            "filters applied"
        );
    }

    /// Listings passing the current filters, in dataset order
    pub fn visible_listings(&self) -> impl Iterator<Item = &Listing> + '_ {
        self.visible.iter().map(|&idx| &self.listings[idx])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total_count(&self) -> usize {
        self.listings.len()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Group the current markers for the current viewport.
    /// Recomputed on demand; pan and zoom change the partition.
    pub fn icons(&self) -> Vec<MapIcon> {
        let points: Vec<DVec2> = self
            .markers
            .iter()
            .map(|m| {
                let l = &self.listings[m.listing];
                self.viewport.project(l.lon, l.lat)
            })
            .collect();

        self.clusterer
            .cluster(&points, self.cluster_radius)
            .into_iter()
            .map(|group| {
                if group.is_cluster() {
                    MapIcon::Cluster {
                        visual: ClusterVisual::for_count(group.len()),
                        listings: group.members.iter().map(|&m| self.markers[m].listing).collect(),
                        at: group.center,
                    }
                } else {
                    let marker = self.markers[group.members[0]];
                    MapIcon::Single {
                        listing: marker.listing,
                        visual: marker.visual,
                        at: group.center,
                    }
                }
            })
            .collect()
    }

    /// Update viewport size and origin when the map area changes
    pub fn resize(&mut self, map_area: Rect) {
        // Braille gives 2x4 resolution per character
        self.viewport.width = map_area.width as usize * 2;
        self.viewport.height = map_area.height as usize * 4;
        self.map_origin = (map_area.x, map_area.y);
    }

    /// Braille pixel at the center of a terminal cell, `None` outside the map
    pub fn cell_to_pixel(&self, col: u16, row: u16) -> Option<DVec2> {
        let (ox, oy) = self.map_origin;
        if col < ox || row < oy {
            return None;
        }
        let p = DVec2::new(
            (col - ox) as f64 * 2.0 + 1.0,
            (row - oy) as f64 * 4.0 + 2.0,
        );
        self.viewport.is_visible(p).then_some(p)
    }

    /// Pan the map by braille pixels
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx as f64, dy as f64);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some(p) = self.cell_to_pixel(col, row) {
            self.viewport.zoom_at(p, 1.0);
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some(p) = self.cell_to_pixel(col, row) {
            self.viewport.zoom_at(p, -1.0);
        }
    }

    /// Back to the initial center and zoom
    pub fn reset_view(&mut self) {
        let (width, height) = (self.viewport.width, self.viewport.height);
        self.viewport = Viewport::new(HOME_LON, HOME_LAT, HOME_ZOOM, width, height);
        self.popup = None;
    }

    /// Handle mouse drag
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            // One cell is 2x4 braille pixels
            let dx = (last_x as i32 - col as i32) * 2;
            let dy = (last_y as i32 - row as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((col, row));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Icon under a terminal cell, nearest first
    pub fn icon_at(&self, col: u16, row: u16) -> Option<MapIcon> {
        let p = self.cell_to_pixel(col, row)?;
        self.icons()
            .into_iter()
            .map(|icon| (icon.position().distance(p), icon))
            .filter(|(d, _)| *d <= HIT_RADIUS)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, icon)| icon)
    }

    /// Left click: a marker opens its card, a cluster zooms to its bounds
    /// (or lists its members once the map cannot zoom further)
    pub fn click(&mut self, col: u16, row: u16) {
        match self.icon_at(col, row) {
            Some(MapIcon::Single { listing, .. }) => {
                self.popup = Some(Popup {
                    listings: vec![listing],
                    current: 0,
                });
            }
            Some(MapIcon::Cluster { listings, .. }) => {
                if self.viewport.at_max_zoom() {
                    self.popup = Some(Popup { listings, current: 0 });
                } else {
                    self.zoom_to(&listings);
                }
            }
            None => self.popup = None,
        }
    }

    fn zoom_to(&mut self, members: &[usize]) {
        let before = self.viewport.zoom;
        let points = members.iter().map(|&idx| {
            let l = &self.listings[idx];
            (l.lon, l.lat)
        });
        self.viewport.fit_bounds(points, FIT_PADDING);
        if self.viewport.zoom <= before {
            self.viewport.zoom = (before + 1.0).min(MAX_ZOOM);
        }
        debug!(members = members.len(), zoom = self.viewport.zoom, "zoomed to cluster");
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Listing shown in the popup
    pub fn selected(&self) -> Option<&Listing> {
        self.popup
            .as_ref()
            .and_then(|p| p.listings.get(p.current))
            .map(|&idx| &self.listings[idx])
    }

    /// Step through the members of a cluster popup
    pub fn cycle_popup(&mut self, forward: bool) {
        if let Some(popup) = &mut self.popup {
            let n = popup.listings.len();
            popup.current = if forward {
                (popup.current + 1) % n
            } else {
                (popup.current + n - 1) % n
            };
        }
    }

    /// Returns false when there was no popup to close
    pub fn close_popup(&mut self) -> bool {
        self.popup.take().is_some()
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.4}°{}, {:.4}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn zoom_level(&self) -> String {
        format!("z{:.0}", self.viewport.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotel::{ClusterBand, PriceTier};

    fn listing(id: u32, lon: f64, lat: f64, price: f64, rating: f64) -> Listing {
        Listing {
            id,
            name: format!("Hotel {id}"),
            lat,
            lon,
            address: format!("{id} Pike St"),
            stars: 4,
            price,
            currency: "USD".to_string(),
            rating,
            review_count: 42,
            image_url: String::new(),
            room_type: "King".to_string(),
            amenities: vec!["WiFi".to_string()],
        }
    }

    /// Three hotels spread across downtown
    fn three() -> Vec<Listing> {
        vec![
            listing(1, -122.3500, 47.6200, 500.0, 8.0),
            listing(2, -122.3358, 47.6132, 900.0, 7.5),
            listing(3, -122.3200, 47.6050, 1500.0, 9.0),
        ]
    }

    fn area() -> Rect {
        Rect::new(1, 3, 100, 40)
    }

    fn ready_app(listings: Vec<Listing>) -> App {
        let now = Instant::now();
        let mut app = App::new(listings, area(), 24.0, Duration::ZERO, now);
        app.tick(now);
        app
    }

    fn cell_at(p: DVec2) -> (u16, u16) {
        (area().x + (p.x / 2.0) as u16, area().y + (p.y / 4.0) as u16)
    }

    fn cell_of(app: &App, idx: usize) -> (u16, u16) {
        let l = &app.listings[idx];
        cell_at(app.viewport.project(l.lon, l.lat))
    }

    #[test]
    fn test_initial_state() {
        let app = ready_app(three());
        assert_eq!(app.filters(), FilterState::new(PriceRange::All, 7.0));
        assert_eq!(app.visible_count(), 3);
        assert_eq!(app.total_count(), 3);
        assert_eq!(app.viewport.zoom, HOME_ZOOM);
        assert_eq!(app.viewport.width, 200);
        assert_eq!(app.viewport.height, 160);
    }

    #[test]
    fn test_loading_transition() {
        let start = Instant::now();
        let mut app = App::new(three(), area(), 24.0, Duration::from_millis(1000), start);
        assert_eq!(app.phase(), Phase::Loading);
        app.tick(start + Duration::from_millis(999));
        assert_eq!(app.phase(), Phase::Loading);
        app.tick(start + Duration::from_millis(1000));
        assert_eq!(app.phase(), Phase::Ready);
        app.tick(start + Duration::from_millis(5000));
        assert!(app.is_ready());
    }

    #[test]
    fn test_mid_filter_shows_only_mid_listing() {
        let mut app = ready_app(three());
        app.set_filters(FilterState::new(PriceRange::Mid, 7.0));
        let prices: Vec<f64> = app.visible_listings().map(|l| l.price).collect();
        assert_eq!(prices, vec![900.0]);
        assert_eq!(app.markers().len(), 1);
        assert_eq!(app.markers()[0].visual.tier, Some(PriceTier::Mid));
    }

    #[test]
    fn test_top_rating_hides_everything() {
        let mut app = ready_app(three());
        app.set_filters(FilterState::new(PriceRange::All, 9.5));
        assert_eq!(app.visible_count(), 0);
        assert!(app.icons().is_empty());
    }

    #[test]
    fn test_empty_dataset_is_usable() {
        let mut app = ready_app(Vec::new());
        assert!(app.is_ready());
        assert_eq!(app.visible_count(), 0);
        assert_eq!(app.total_count(), 0);
        assert!(app.icons().is_empty());

        app.set_price_range(PriceRange::Luxury);
        app.click(area().x + 10, area().y + 10);
        assert!(app.popup().is_none());
    }

    #[test]
    fn test_rating_nudge_and_price_cycle() {
        let mut app = ready_app(three());
        app.nudge_rating(10);
        assert_eq!(app.filters().min_rating, 8.0);
        assert_eq!(app.visible_count(), 2);

        app.cycle_price_range();
        assert_eq!(app.filters().price_range, PriceRange::Budget);
        assert_eq!(app.visible_count(), 1);

        app.set_price_range(PriceRange::All);
        assert_eq!(app.filters().min_rating, 8.0);
    }

    #[test]
    fn test_spread_listings_are_single_markers() {
        let app = ready_app(three());
        let icons = app.icons();
        assert_eq!(icons.len(), 3);
        assert!(icons.iter().all(|i| matches!(i, MapIcon::Single { .. })));
    }

    #[test]
    fn test_click_marker_opens_card() {
        let mut app = ready_app(three());
        let (col, row) = cell_of(&app, 1);
        app.click(col, row);
        assert_eq!(app.selected().map(|l| l.id), Some(2));

        assert!(app.close_popup());
        assert!(!app.close_popup());
    }

    #[test]
    fn test_click_empty_map_closes_card() {
        let mut app = ready_app(three());
        let (col, row) = cell_of(&app, 1);
        app.click(col, row);
        app.click(area().x, area().y);
        assert!(app.popup().is_none());
    }

    #[test]
    fn test_filter_change_drops_hidden_selection() {
        let mut app = ready_app(three());
        let (col, row) = cell_of(&app, 0);
        app.click(col, row);
        assert!(app.selected().is_some());
        app.set_price_range(PriceRange::Luxury);
        assert!(app.selected().is_none());
    }

    #[test]
    fn test_cluster_click_zooms_then_lists_members() {
        let listings = vec![
            listing(1, -122.33580, 47.61320, 500.0, 8.0),
            listing(2, -122.33575, 47.61322, 900.0, 8.5),
            listing(3, -122.33570, 47.61318, 1300.0, 9.0),
        ];
        let mut app = ready_app(listings);

        let icons = app.icons();
        assert_eq!(icons.len(), 1);
        match &icons[0] {
            MapIcon::Cluster { listings, visual, .. } => {
                assert_eq!(listings, &vec![0, 1, 2]);
                assert_eq!(visual.band, ClusterBand::Medium);
                assert_eq!(visual.label, "3");
            }
            other => panic!("expected a cluster, got {other:?}"),
        }

        let (col, row) = cell_at(icons[0].position());
        app.click(col, row);
        assert!(app.viewport.at_max_zoom());
        assert!(app.popup().is_none());

        // Still overlapping at max zoom, so the next click lists the members
        let icons = app.icons();
        assert_eq!(icons.len(), 1);
        let (col, row) = cell_at(icons[0].position());
        app.click(col, row);
        let popup = app.popup().expect("cluster popup");
        assert_eq!(popup.listings, vec![0, 1, 2]);
        assert_eq!(app.selected().map(|l| l.id), Some(1));
    }

    struct NoClustering;

    impl Clusterer for NoClustering {
        fn cluster(&self, points: &[DVec2], _max_radius: f64) -> Vec<crate::map::MarkerGroup> {
            points
                .iter()
                .enumerate()
                .map(|(i, &p)| crate::map::MarkerGroup {
                    members: vec![i],
                    center: p,
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_clusterer() {
        let listings = vec![
            listing(1, -122.33580, 47.61320, 500.0, 8.0),
            listing(2, -122.33575, 47.61322, 900.0, 8.5),
        ];
        let app = ready_app(listings).with_clusterer(NoClustering);
        let icons = app.icons();
        assert_eq!(icons.len(), 2);
        assert!(icons.iter().all(|i| matches!(i, MapIcon::Single { .. })));
    }

    #[test]
    fn test_cluster_popup_cycles() {
        let mut app = ready_app(three());
        app.popup = Some(Popup {
            listings: vec![0, 1, 2],
            current: 0,
        });
        app.cycle_popup(false);
        assert_eq!(app.selected().map(|l| l.id), Some(3));
        app.cycle_popup(true);
        app.cycle_popup(true);
        assert_eq!(app.selected().map(|l| l.id), Some(2));
    }

    #[test]
    fn test_reset_view() {
        let mut app = ready_app(three());
        app.pan(40, 40);
        app.zoom_in();
        app.reset_view();
        assert_eq!(app.viewport.center_lon, HOME_LON);
        assert_eq!(app.viewport.zoom, HOME_ZOOM);
        assert_eq!(app.viewport.width, 200);
    }

    #[test]
    fn test_cell_outside_map_has_no_pixel() {
        let app = ready_app(three());
        assert!(app.cell_to_pixel(0, 0).is_none());
        assert!(app.cell_to_pixel(1, 3).is_some());
        assert!(app.cell_to_pixel(101, 3).is_none());
    }
}
