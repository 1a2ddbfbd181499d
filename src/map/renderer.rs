use glam::DVec2;

use crate::braille::BrailleCanvas;
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Base map layer a line belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseLayer {
    /// Water edges
    Shoreline,
    /// Streets and anything else loaded from a GeoJSON file
    Detail,
}

/// Rendered base map, one canvas per layer so the UI can color them apart
pub struct BaseMap {
    pub shoreline: BrailleCanvas,
    pub detail: BrailleCanvas,
}

/// Base map renderer
pub struct MapRenderer {
    shoreline: Vec<LineString>,
    detail: Vec<LineString>,
    pub show_detail: bool,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            shoreline: Vec::new(),
            detail: Vec::new(),
            show_detail: true,
        }
    }

    pub fn add_line(&mut self, line: LineString, layer: BaseLayer) {
        if line.len() < 2 {
            return;
        }
        match layer {
            BaseLayer::Shoreline => self.shoreline.push(line),
            BaseLayer::Detail => self.detail.push(line),
        }
    }

    pub fn line_count(&self) -> usize {
        self.shoreline.len() + self.detail.len()
    }

    /// Check if any data is loaded
    pub fn has_data(&self) -> bool {
        self.line_count() > 0
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    /// Render base map layers for a character area of `width` x `height`
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport) -> BaseMap {
        let mut shoreline = BrailleCanvas::new(width, height);
        let mut detail = BrailleCanvas::new(width, height);

        for line in &self.shoreline {
            draw_linestring(&mut shoreline, line, viewport);
        }
        if self.show_detail {
            for line in &self.detail {
                draw_linestring(&mut detail, line, viewport);
            }
        }

        BaseMap { shoreline, detail }
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring, clipping each segment to the viewport
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    let mut prev: Option<(f64, DVec2)> = None;

    for &(lon, lat) in line {
        let p = viewport.project(lon, lat);

        if let Some((prev_lon, q)) = prev {
            // Segments spanning more than half the globe wrap the antimeridian
            if (lon - prev_lon).abs() <= 180.0 {
                if let Some((a, b)) = viewport.clip_segment(q, p) {
                    canvas.line(a.x as i32, a.y as i32, b.x as i32, b.y as i32);
                }
            }
        }

        prev = Some((lon, p));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MAX_ZOOM;

    #[test]
    fn test_renders_visible_line() {
        let mut renderer = MapRenderer::new();
        renderer.add_line(vec![(-122.35, 47.61), (-122.32, 47.61)], BaseLayer::Shoreline);
        let vp = Viewport::new(-122.3358, 47.6132, 13.0, 80, 40);
        let map = renderer.render(40, 10, &vp);
        let drawn = (0..10).any(|row| (0..40).any(|col| map.shoreline.glyph(col, row).is_some()));
        assert!(drawn);
    }

    #[test]
    fn test_detail_toggle() {
        let mut renderer = MapRenderer::new();
        renderer.add_line(vec![(-122.35, 47.61), (-122.32, 47.61)], BaseLayer::Detail);
        renderer.toggle_detail();
        let vp = Viewport::new(-122.3358, 47.6132, 13.0, 80, 40);
        let map = renderer.render(40, 10, &vp);
        assert!((0..10).all(|row| (0..40).all(|col| map.detail.glyph(col, row).is_none())));
    }

    fn any_glyph(canvas: &BrailleCanvas) -> bool {
        (0..canvas.height()).any(|row| (0..canvas.width()).any(|col| canvas.glyph(col, row).is_some()))
    }

    #[test]
    fn test_long_segment_drawn_at_max_zoom() {
        // ~1.4 km street crossing the whole screen, far wider than the viewport
        let mut renderer = MapRenderer::new();
        renderer.add_line(vec![(-122.345, 47.6132), (-122.326, 47.6132)], BaseLayer::Detail);
        let vp = Viewport::new(-122.3358, 47.6132, MAX_ZOOM, 80, 40);
        let map = renderer.render(40, 10, &vp);
        assert!(any_glyph(&map.detail));
        // Spans the full width
        assert!((0..10).any(|row| map.detail.glyph(0, row).is_some()));
        assert!((0..10).any(|row| map.detail.glyph(39, row).is_some()));
    }

    #[test]
    fn test_antimeridian_wrap_skipped() {
        let mut renderer = MapRenderer::new();
        renderer.add_line(vec![(179.9, 0.0), (-179.9, 0.0)], BaseLayer::Shoreline);
        let vp = Viewport::new(179.95, 0.0, 3.0, 80, 40);
        let map = renderer.render(40, 10, &vp);
        assert!(!any_glyph(&map.shoreline));
    }

    #[test]
    fn test_degenerate_lines_dropped() {
        let mut renderer = MapRenderer::new();
        renderer.add_line(vec![(0.0, 0.0)], BaseLayer::Detail);
        assert!(!renderer.has_data());
    }
}
