use ratatui::style::Color;

use super::tier::PriceTier;

/// Marker color for budget listings (emerald)
pub const BUDGET_COLOR: Color = Color::Rgb(0x10, 0xB9, 0x81);
/// Marker color for mid-range listings (amber)
pub const MID_COLOR: Color = Color::Rgb(0xF5, 0x9E, 0x0B);
/// Marker color for luxury listings (red)
pub const LUXURY_COLOR: Color = Color::Rgb(0xEF, 0x44, 0x44);
/// Marker color for listings whose price could not be read
pub const UNPRICED_COLOR: Color = Color::Gray;

/// Glyph drawn for a single hotel
pub const MARKER_GLYPH: char = '●';

/// Visual of a single hotel marker
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerVisual {
    pub tier: Option<PriceTier>,
    pub color: Color,
}

impl MarkerVisual {
    pub fn for_tier(tier: Option<PriceTier>) -> Self {
        let color = match tier {
            Some(PriceTier::Budget) => BUDGET_COLOR,
            Some(PriceTier::Mid) => MID_COLOR,
            Some(PriceTier::Luxury) => LUXURY_COLOR,
            None => UNPRICED_COLOR,
        };
        Self { tier, color }
    }

    pub fn for_price(price: f64) -> Self {
        Self::for_tier(PriceTier::classify(price))
    }
}
