/// Upper bound (exclusive) of the budget tier, in listing currency per night
pub const BUDGET_CEILING: f64 = 800.0;
/// Upper bound (exclusive) of the mid tier
pub const MID_CEILING: f64 = 1200.0;

/// Price tier derived from a nightly price.
/// Segmentation is closed below / open above: [0, 800), [800, 1200), [1200, ∞)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceTier {
    Budget,
    Mid,
    Luxury,
}

impl PriceTier {
    /// All tiers in ascending price order (legend order)
    pub const ALL: [PriceTier; 3] = [PriceTier::Budget, PriceTier::Mid, PriceTier::Luxury];

    /// Classify a normalized price.
    ///
    /// Returns `None` for prices outside the classifiable domain (NaN,
    /// infinite or negative), which keeps malformed records out of every
    /// tier instead of silently landing in one.
    pub fn classify(price: f64) -> Option<Self> {
        if !price.is_finite() || price < 0.0 {
            return None;
        }
        if price < BUDGET_CEILING {
            Some(PriceTier::Budget)
        } else if price < MID_CEILING {
            Some(PriceTier::Mid)
        } else {
            Some(PriceTier::Luxury)
        }
    }

    /// Badge label shown on the hotel card
    pub fn label(self) -> &'static str {
        match self {
            PriceTier::Budget => "Budget",
            PriceTier::Mid => "Mid Range",
            PriceTier::Luxury => "Luxury",
        }
    }

    /// Price band description for the legend
    pub fn range_text(self) -> &'static str {
        match self {
            PriceTier::Budget => "<$800",
            PriceTier::Mid => "$800-$1200",
            PriceTier::Luxury => ">$1200",
        }
    }
}
