mod cluster;
mod projection;
mod renderer;
mod spatial;

pub use cluster::{Clusterer, GreedyClusterer, MarkerGroup, DEFAULT_CLUSTER_RADIUS};
pub use projection::{Viewport, MAX_ZOOM, MIN_ZOOM};
pub use renderer::{BaseLayer, BaseMap, MapRenderer};
pub use spatial::SpatialGrid;
