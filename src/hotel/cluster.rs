use ratatui::style::Color;

/// Clusters below this many members are small
pub const MEDIUM_THRESHOLD: usize = 3;
/// Clusters at or above this many members are large
pub const LARGE_THRESHOLD: usize = 6;

/// Size band of a marker cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClusterBand {
    Small,
    Medium,
    Large,
}

impl ClusterBand {
    /// Band for a member count: [0, 3), [3, 6), [6, ∞)
    pub fn for_count(count: usize) -> Self {
        if count < MEDIUM_THRESHOLD {
            ClusterBand::Small
        } else if count < LARGE_THRESHOLD {
            ClusterBand::Medium
        } else {
            ClusterBand::Large
        }
    }

    /// Nominal icon diameter in screen pixels
    pub fn size(self) -> u16 {
        match self {
            ClusterBand::Small => 35,
            ClusterBand::Medium => 45,
            ClusterBand::Large => 55,
        }
    }

    pub fn color(self) -> Color {
        match self {
            ClusterBand::Small => Color::Rgb(0x3B, 0x82, 0xF6),
            ClusterBand::Medium => Color::Rgb(0xF5, 0x9E, 0x0B),
            ClusterBand::Large => Color::Rgb(0xEF, 0x44, 0x44),
        }
    }

    /// Cells of padding on each side of the label in the terminal badge
    pub fn padding(self) -> usize {
        match self {
            ClusterBand::Small => 0,
            ClusterBand::Medium => 1,
            ClusterBand::Large => 2,
        }
    }

    /// Legend text
    pub fn description(self) -> &'static str {
        match self {
            ClusterBand::Small => "Small (2 hotels)",
            ClusterBand::Medium => "Medium (3-5 hotels)",
            ClusterBand::Large => "Large (6+ hotels)",
        }
    }
}

/// Icon of a marker cluster, derived only from its member count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterVisual {
    pub band: ClusterBand,
    pub size: u16,
    pub color: Color,
    pub label: String,
}

impl ClusterVisual {
    pub fn for_count(count: usize) -> Self {
        let band = ClusterBand::for_count(count);
        Self {
            band,
            size: band.size(),
            color: band.color(),
            label: count.to_string(),
        }
    }

    /// Padded badge text, e.g. `" 4 "` for a medium cluster
    pub fn badge(&self) -> String {
        let pad = " ".repeat(self.band.padding());
        format!("{pad}{}{pad}", self.label)
    }
}
