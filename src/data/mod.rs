use crate::error::{DataError, Result};
use crate::hotel::{Listing, RawListing};
use crate::map::{BaseLayer, MapRenderer};
use geojson::{GeoJson, Geometry, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Seattle dataset compiled into the binary, used when no path is given
const BUNDLED_DATASET: &[u8] = include_bytes!("../../data/seattle_hotels.json");

/// Load listings from a JSON file
pub fn load_listings(path: &Path) -> Result<Vec<Listing>> {
    let mut bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let listings = parse_listings(&mut bytes)?;
    info!(path = %path.display(), count = listings.len(), "loaded hotel dataset");
    Ok(listings)
}

/// Load the dataset bundled with the binary
pub fn bundled_listings() -> Result<Vec<Listing>> {
    let mut bytes = BUNDLED_DATASET.to_vec();
    let listings = parse_listings(&mut bytes)?;
    info!(count = listings.len(), "loaded bundled Seattle dataset");
    Ok(listings)
}

/// Parse and normalize a JSON array of hotel records.
/// simd-json parses in place, hence the mutable buffer.
pub fn parse_listings(bytes: &mut [u8]) -> Result<Vec<Listing>> {
    let raw: Vec<RawListing> = simd_json::serde::from_slice(bytes)?;
    if raw.is_empty() {
        warn!("hotel dataset contains no listings");
    }

    let mut seen = HashSet::with_capacity(raw.len());
    let listings: Vec<Listing> = raw
        .into_iter()
        .map(|record| {
            let listing = Listing::from(record);
            audit(&listing, &mut seen);
            listing
        })
        .collect();

    Ok(listings)
}

/// Log records that will render with degraded fidelity
fn audit(listing: &Listing, seen: &mut HashSet<u32>) {
    if !seen.insert(listing.id) {
        warn!(id = listing.id, name = %listing.name, "duplicate hotel id");
    }
    if !listing.has_valid_price() {
        warn!(
            id = listing.id,
            name = %listing.name,
            "price is not a number; excluded from price tiers"
        );
    }
    if !(1..=5).contains(&listing.stars) {
        warn!(id = listing.id, stars = listing.stars, "star rating outside 1-5");
    }
    if listing.image().is_none() {
        debug!(id = listing.id, "no usable image reference");
    }
}

/// Load an optional GeoJSON base map (shoreline, roads) into the renderer.
/// Unreadable files are logged and skipped.
pub fn load_basemap(renderer: &mut MapRenderer, path: &Path) {
    match read_geojson(path) {
        Ok(geojson) => {
            let before = renderer.line_count();
            process_geojson_lines(&geojson, |line| renderer.add_line(line, BaseLayer::Detail));
            info!(
                path = %path.display(),
                lines = renderer.line_count() - before,
                "loaded base map"
            );
        }
        Err(e) => warn!(path = %path.display(), "failed to load base map: {e:#}"),
    }
}

fn read_geojson(path: &Path) -> anyhow::Result<GeoJson> {
    let content = fs::read_to_string(path)?;
    Ok(content.parse()?)
}

/// Process GeoJSON and extract line features
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    let to_line = |coords: &Vec<Vec<f64>>| -> Vec<(f64, f64)> {
        coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
    };

    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(to_line(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Rough Elliott Bay / Lake Union shoreline for when no base map file is available
pub fn generate_waterfront(renderer: &mut MapRenderer) {
    // Elliott Bay, Magnolia down to the West Seattle shore
    renderer.add_line(
        vec![
            (-122.4180, 47.6560), (-122.4120, 47.6470), (-122.4040, 47.6360),
            (-122.3870, 47.6310), (-122.3720, 47.6260), (-122.3610, 47.6180),
            (-122.3520, 47.6110), (-122.3440, 47.6050), (-122.3390, 47.5990),
            (-122.3400, 47.5900), (-122.3560, 47.5850), (-122.3700, 47.5880),
            (-122.3850, 47.5900), (-122.4010, 47.5860), (-122.4120, 47.5780),
        ],
        BaseLayer::Shoreline,
    );

    // Lake Union
    renderer.add_line(
        vec![
            (-122.3390, 47.6270), (-122.3330, 47.6280), (-122.3290, 47.6340),
            (-122.3270, 47.6430), (-122.3310, 47.6490), (-122.3400, 47.6480),
            (-122.3460, 47.6420), (-122.3470, 47.6350), (-122.3440, 47.6290),
            (-122.3390, 47.6270),
        ],
        BaseLayer::Shoreline,
    );

    // Lake Washington, west shore
    renderer.add_line(
        vec![
            (-122.2880, 47.6620), (-122.2790, 47.6460), (-122.2800, 47.6300),
            (-122.2830, 47.6150), (-122.2840, 47.6000), (-122.2800, 47.5850),
        ],
        BaseLayer::Shoreline,
    );
}
