use glam::DVec2;
use std::f64::consts::PI;

/// World width in braille pixels at zoom level 0.
/// One braille pixel is roughly three browser pixels, so this is a 256px
/// slippy-map tile scaled down to terminal resolution.
pub const WORLD_PX_AT_ZOOM_0: f64 = 96.0;
pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Web Mercator stops being invertible at the poles
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude
    pub center_lat: f64,
    /// Slippy-map zoom level (each step doubles the scale)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Normalized Web Mercator coordinates in [0, 1] x [0, 1]
fn mercator(lon: f64, lat: f64) -> DVec2 {
    let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (lon + 180.0) / 360.0;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    DVec2::new(x, y)
}

fn inverse_mercator(p: DVec2) -> (f64, f64) {
    let lon = p.x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * p.y)).sinh().atan().to_degrees();
    (lon, lat)
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    /// Size of the whole world in pixels at the current zoom
    fn world_size(&self) -> f64 {
        WORLD_PX_AT_ZOOM_0 * self.zoom.exp2()
    }

    fn half_size(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64) * 0.5
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> DVec2 {
        let offset = mercator(lon, lat) - mercator(self.center_lon, self.center_lat);
        offset * self.world_size() + self.half_size()
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, p: DVec2) -> (f64, f64) {
        let world = (p - self.half_size()) / self.world_size() + mercator(self.center_lon, self.center_lat);
        inverse_mercator(world)
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let (lon, lat) = self.unproject(self.half_size() + DVec2::new(dx, dy));
        self.center_lon = lon;
        self.center_lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);

        // Wrap longitude
        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1.0).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - 1.0).max(MIN_ZOOM);
    }

    pub fn at_max_zoom(&self) -> bool {
        self.zoom >= MAX_ZOOM
    }

    /// Zoom by `delta` levels keeping the point under `p` fixed on screen
    pub fn zoom_at(&mut self, p: DVec2, delta: f64) {
        let (lon, lat) = self.unproject(p);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);

        // Pan to bring the anchor back under the cursor
        let drift = self.project(lon, lat) - p;
        self.pan(drift.x, drift.y);
    }

    /// Center on the bounding box of `points` (lon, lat) and pick the highest
    /// whole zoom level at which it still fits, keeping a margin of `pad` pixels
    pub fn fit_bounds(&mut self, points: impl IntoIterator<Item = (f64, f64)>, pad: f64) {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for (lon, lat) in points {
            let m = mercator(lon, lat);
            min = min.min(m);
            max = max.max(m);
        }
        if !min.is_finite() || !max.is_finite() {
            return;
        }

        let (lon, lat) = inverse_mercator((min + max) * 0.5);
        self.center_lon = lon;
        self.center_lat = lat;

        let span = (max - min).max(DVec2::splat(f64::EPSILON));
        let avail = (DVec2::new(self.width as f64, self.height as f64) - DVec2::splat(pad * 2.0))
            .max(DVec2::ONE);
        let fit = (avail / (span * WORLD_PX_AT_ZOOM_0)).min_element().log2().floor();
        self.zoom = fit.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Check if a projected point is visible in the viewport
    pub fn is_visible(&self, p: DVec2) -> bool {
        p.x >= 0.0 && p.x < self.width as f64 && p.y >= 0.0 && p.y < self.height as f64
    }

    /// Clip a projected segment to the viewport plus a one pixel margin
    /// (Liang-Barsky). Returns `None` when no part of it is on screen.
    pub fn clip_segment(&self, a: DVec2, b: DVec2) -> Option<(DVec2, DVec2)> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }

        let lo = DVec2::splat(-1.0);
        let hi = DVec2::new(self.width as f64, self.height as f64) + DVec2::ONE;
        let d = b - a;
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

        for (p, q) in [
            (-d.x, a.x - lo.x),
            (d.x, hi.x - a.x),
            (-d.y, a.y - lo.y),
            (d.y, hi.y - a.y),
        ] {
            if p == 0.0 {
                // Parallel to this edge and outside it
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t0 = t0.max(q / p);
            } else {
                t1 = t1.min(q / p);
            }
            if t0 > t1 {
                return None;
            }
        }

        Some((a + d * t0, a + d * t1))
    }
}
