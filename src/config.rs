use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use crate::map::DEFAULT_CLUSTER_RADIUS;

/// Command-line arguments for hotel-map
#[derive(Parser, Debug, Clone)]
#[command(name = "hotel-map")]
#[command(about = "Browse hotel listings on a terminal map, filtered by price tier and rating")]
#[command(version)]
pub struct Args {
    /// Hotel dataset (JSON array); the bundled Seattle dataset is used when omitted
    #[arg(short, long, env = "HOTEL_MAP_DATASET")]
    pub dataset: Option<PathBuf>,

    /// GeoJSON file with base map lines (streets, shoreline)
    #[arg(short, long)]
    pub basemap: Option<PathBuf>,

    /// Maximum marker grouping radius in braille pixels
    #[arg(long, default_value_t = DEFAULT_CLUSTER_RADIUS)]
    pub cluster_radius: f64,

    /// Duration of the loading screen in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub loading_ms: u64,

    /// Log file (the terminal is taken by the map)
    #[arg(long, default_value = "hotel-map.log")]
    pub log_file: PathBuf,
}

impl Args {
    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_ms)
    }

    /// Open the log file, or `None` if it cannot be created
    pub fn open_log(&self) -> Option<File> {
        File::create(&self.log_file).ok()
    }
}
