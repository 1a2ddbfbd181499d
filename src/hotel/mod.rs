//! Listing model and the pure classification/filtering rules applied to it.

mod cluster;
mod filter;
mod listing;
mod marker;
mod tier;

pub use cluster::{ClusterBand, ClusterVisual};
pub use filter::{
    filter_all, matches, visible_indices, FilterState, PriceRange, MIN_RATING_CEILING,
    MIN_RATING_FLOOR,
};
pub use listing::{amenity_icon, Listing, RawListing, RawPrice};
pub use marker::{MarkerVisual, MARKER_GLYPH};
pub use tier::PriceTier;
