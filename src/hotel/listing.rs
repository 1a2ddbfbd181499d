use serde::Deserialize;

/// Nightly price as it appears in the dataset: either a JSON number or a
/// decimal string such as `"950"`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    /// Coerce to a numeric price. Malformed text yields NaN, which the tier
    /// classifier treats as "no tier".
    pub fn normalize(&self) -> f64 {
        match self {
            RawPrice::Number(n) => *n,
            RawPrice::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        }
    }
}

/// One hotel record exactly as stored in the dataset file
#[derive(Clone, Debug, Deserialize)]
pub struct RawListing {
    pub hotel_id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub star_rating: u8,
    pub price_per_night: RawPrice,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub rating: f64,
    pub review_count: u32,
    #[serde(default)]
    pub image_url: String,
    pub room_type: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A normalized, immutable hotel listing
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub address: String,
    /// Marketing classification, 1-5
    pub stars: u8,
    /// Nightly price; NaN when the source value was not a number
    pub price: f64,
    pub currency: String,
    /// Guest rating, observed domain 7.0-9.5
    pub rating: f64,
    pub review_count: u32,
    pub image_url: String,
    pub room_type: String,
    pub amenities: Vec<String>,
}

impl From<RawListing> for Listing {
    fn from(raw: RawListing) -> Self {
        Self {
            id: raw.hotel_id,
            name: raw.name,
            lat: raw.latitude,
            lon: raw.longitude,
            address: raw.address,
            stars: raw.star_rating,
            price: raw.price_per_night.normalize(),
            currency: raw.currency,
            rating: raw.rating,
            review_count: raw.review_count,
            image_url: raw.image_url,
            room_type: raw.room_type,
            amenities: raw.amenities,
        }
    }
}

impl Listing {
    /// Whether the price survived normalization
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }

    /// Image reference if it looks loadable; broken references are hidden
    pub fn image(&self) -> Option<&str> {
        let url = self.image_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Some(url)
        } else {
            None
        }
    }
}

/// Icon for an amenity label. Unknown labels fall back to a checkmark.
pub fn amenity_icon(amenity: &str) -> &'static str {
    match amenity {
        "WiFi" | "Free WiFi" => "📶",
        "Pool" | "Indoor Pool" => "🏊",
        "Gym" | "Fitness Center" => "💪",
        "Spa" => "💆",
        "Restaurant" => "🍽",
        "Bar" => "🍸",
        "Parking" | "Valet Parking" => "🅿",
        "Room Service" => "🛎",
        "Business Center" => "💼",
        "Pet Friendly" => "🐾",
        "Concierge" => "🤵",
        "Airport Shuttle" => "🚐",
        _ => "✓",
    }
}
