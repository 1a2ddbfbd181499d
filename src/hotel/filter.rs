use super::listing::Listing;
use super::tier::PriceTier;

/// Lowest selectable minimum rating
pub const MIN_RATING_FLOOR: f64 = 7.0;
/// Highest selectable minimum rating
pub const MIN_RATING_CEILING: f64 = 9.5;
/// Slider step for the minimum rating
pub const RATING_STEP: f64 = 0.1;

/// Price-tier selector of the filter panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriceRange {
    #[default]
    All,
    Budget,
    Mid,
    Luxury,
}

impl PriceRange {
    /// Radio options in panel order
    pub const OPTIONS: [PriceRange; 4] = [
        PriceRange::All,
        PriceRange::Budget,
        PriceRange::Mid,
        PriceRange::Luxury,
    ];

    /// Whether a listing in `tier` passes this selector.
    /// Unclassifiable listings pass only `All`.
    pub fn admits(self, tier: Option<PriceTier>) -> bool {
        match self {
            PriceRange::All => true,
            PriceRange::Budget => tier == Some(PriceTier::Budget),
            PriceRange::Mid => tier == Some(PriceTier::Mid),
            PriceRange::Luxury => tier == Some(PriceTier::Luxury),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceRange::All => "All Prices",
            PriceRange::Budget => "Budget (<$800)",
            PriceRange::Mid => "Mid Range ($800-$1200)",
            PriceRange::Luxury => "Luxury (>$1200)",
        }
    }

    /// Next option, wrapping around
    pub fn next(self) -> Self {
        match self {
            PriceRange::All => PriceRange::Budget,
            PriceRange::Budget => PriceRange::Mid,
            PriceRange::Mid => PriceRange::Luxury,
            PriceRange::Luxury => PriceRange::All,
        }
    }
}

/// The user's current filter selection. Replaced wholesale on every change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterState {
    pub price_range: PriceRange,
    /// Inclusive lower bound on guest rating
    pub min_rating: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            price_range: PriceRange::All,
            min_rating: MIN_RATING_FLOOR,
        }
    }
}

impl FilterState {
    pub fn new(price_range: PriceRange, min_rating: f64) -> Self {
        Self {
            price_range,
            min_rating,
        }
    }

    /// Copy of this state with a different price selector
    pub fn with_price_range(self, price_range: PriceRange) -> Self {
        Self {
            price_range,
            ..self
        }
    }

    /// Copy of this state with the rating moved to the nearest slider step
    /// inside 7.0..=9.5
    pub fn with_min_rating(self, min_rating: f64) -> Self {
        // Divide rather than multiply by the step so 7.0 + 0.1 * 3 lands exactly on 7.3
        let stepped = (min_rating / RATING_STEP).round() / (1.0 / RATING_STEP);
        Self {
            min_rating: stepped.clamp(MIN_RATING_FLOOR, MIN_RATING_CEILING),
            ..self
        }
    }

    /// Raise or lower the rating by `steps` slider increments
    pub fn nudge_rating(self, steps: i32) -> Self {
        self.with_min_rating(self.min_rating + steps as f64 * RATING_STEP)
    }
}

/// Inclusion decision for a single listing: tier match AND rating match
pub fn matches(listing: &Listing, filter: &FilterState) -> bool {
    let tier_ok = filter.price_range.admits(PriceTier::classify(listing.price));
    let rating_ok = listing.rating >= filter.min_rating;
    tier_ok && rating_ok
}

/// Indices of the listings passing `filter`, in dataset order
pub fn visible_indices(listings: &[Listing], filter: &FilterState) -> Vec<usize> {
    listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| matches(listing, filter))
        .map(|(idx, _)| idx)
        .collect()
}

/// Ordered subsequence of `listings` passing `filter`
pub fn filter_all<'a>(listings: &'a [Listing], filter: &FilterState) -> Vec<&'a Listing> {
    listings.iter().filter(|listing| matches(listing, filter)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: u32, price: f64, rating: f64) -> Listing {
        Listing {
            id,
            name: format!("Hotel {id}"),
            lat: 47.61,
            lon: -122.33,
            address: String::new(),
            stars: 4,
            price,
            currency: "USD".to_string(),
            rating,
            review_count: 100,
            image_url: String::new(),
            room_type: "Queen".to_string(),
            amenities: vec![],
        }
    }

    fn three() -> Vec<Listing> {
        vec![
            listing(1, 500.0, 8.0),
            listing(2, 900.0, 7.5),
            listing(3, 1500.0, 9.0),
        ]
    }

    fn sample() -> Vec<Listing> {
        let mut out = Vec::new();
        let mut id = 0;
        for price in [0.0, 450.0, 799.0, 800.0, 1000.0, 1199.0, 1200.0, 2500.0, f64::NAN] {
            for rating in [7.0, 7.4, 8.0, 8.9, 9.5] {
                id += 1;
                out.push(listing(id, price, rating));
            }
        }
        out
    }

    fn states() -> Vec<FilterState> {
        let mut out = Vec::new();
        for range in PriceRange::OPTIONS {
            for rating in [7.0, 7.5, 8.0, 8.9, 9.0, 9.5] {
                out.push(FilterState::new(range, rating));
            }
        }
        out
    }

    #[test]
    fn test_mid_scenario() {
        let listings = three();
        let visible = filter_all(&listings, &FilterState::new(PriceRange::Mid, 7.0));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].price, 900.0);
    }

    #[test]
    fn test_nothing_reaches_top_rating() {
        let listings = three();
        let visible = filter_all(&listings, &FilterState::new(PriceRange::All, 9.5));
        assert!(visible.is_empty());
    }

    #[test]
    fn test_matches_definition() {
        let listings = sample();
        for filter in states() {
            for l in &listings {
                let tier_ok = filter.price_range == PriceRange::All
                    || match (PriceTier::classify(l.price), filter.price_range) {
                        (Some(PriceTier::Budget), PriceRange::Budget) => true,
                        (Some(PriceTier::Mid), PriceRange::Mid) => true,
                        (Some(PriceTier::Luxury), PriceRange::Luxury) => true,
                        _ => false,
                    };
                let expected = tier_ok && l.rating >= filter.min_rating;
                assert_eq!(matches(l, &filter), expected, "{l:?} {filter:?}");
            }
        }
    }

    #[test]
    fn test_rating_bound_is_inclusive() {
        let l = listing(1, 900.0, 8.0);
        assert!(matches(&l, &FilterState::new(PriceRange::Mid, 8.0)));
        assert!(!matches(&l, &FilterState::new(PriceRange::Mid, 8.1)));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let listings = sample();
        for filter in states() {
            let once: Vec<Listing> = filter_all(&listings, &filter).into_iter().cloned().collect();
            let twice: Vec<Listing> = filter_all(&once, &filter).into_iter().cloned().collect();
            assert_eq!(once.len(), twice.len());
            for (a, b) in once.iter().zip(&twice) {
                assert_eq!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let listings = sample();
        let ids: Vec<u32> = filter_all(&listings, &FilterState::default())
            .iter()
            .map(|l| l.id)
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ids.len(), listings.len());
    }

    #[test]
    fn test_raising_rating_never_grows_visible_set() {
        let listings = sample();
        for range in PriceRange::OPTIONS {
            let mut prev = usize::MAX;
            for step in 0..=25 {
                let filter = FilterState::default()
                    .with_price_range(range)
                    .with_min_rating(7.0 + step as f64 * 0.1);
                let n = visible_indices(&listings, &filter).len();
                assert!(n <= prev, "{filter:?}");
                prev = n;
            }
        }
    }

    #[test]
    fn test_narrowing_tier_never_grows_visible_set() {
        let listings = sample();
        for rating in [7.0, 8.0, 9.5] {
            let all = visible_indices(&listings, &FilterState::new(PriceRange::All, rating));
            for range in [PriceRange::Budget, PriceRange::Mid, PriceRange::Luxury] {
                let narrow = visible_indices(&listings, &FilterState::new(range, rating));
                assert!(narrow.len() <= all.len());
                assert!(narrow.iter().all(|i| all.contains(i)));
            }
        }
    }

    #[test]
    fn test_unpriced_listing_only_visible_under_all() {
        let l = listing(7, f64::NAN, 9.0);
        assert!(matches(&l, &FilterState::default()));
        for range in [PriceRange::Budget, PriceRange::Mid, PriceRange::Luxury] {
            assert!(!matches(&l, &FilterState::new(range, 7.0)));
        }
    }

    #[test]
    fn test_text_price_classifies_mid() {
        use crate::hotel::listing::RawPrice;
        let mut l = listing(9, 0.0, 8.0);
        l.price = RawPrice::Text("950".to_string()).normalize();
        assert_eq!(PriceTier::classify(l.price), Some(PriceTier::Mid));
        assert!(matches(&l, &FilterState::new(PriceRange::Mid, 7.0)));
    }

    #[test]
    fn test_rating_slider_steps_and_clamps() {
        let f = FilterState::default();
        assert_eq!(f.nudge_rating(3).min_rating, 7.3);
        assert_eq!(f.nudge_rating(-5).min_rating, 7.0);
        assert_eq!(f.nudge_rating(100).min_rating, 9.5);
        assert_eq!(f.with_min_rating(8.04).min_rating, 8.0);
    }

    #[test]
    fn test_price_range_cycles() {
        let mut range = PriceRange::All;
        for _ in 0..4 {
            range = range.next();
        }
        assert_eq!(range, PriceRange::All);
    }
}
