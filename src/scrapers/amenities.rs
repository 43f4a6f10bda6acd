//! Amenity flags from the free-text amenity blob.
//!
//! The amenities page lists every amenity by name and prefixes the ones a
//! host explicitly lacks with "Unavailable:". An empty blob means the page
//! could not be fetched, which keeps every flag unknown rather than false.

/// Tri-state presence flags for the tracked amenities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmenityFlags {
    pub kitchen: Option<bool>,
    pub wifi: Option<bool>,
    pub washer: Option<bool>,
    pub tv: Option<bool>,
    pub parking: Option<bool>,
    pub refrigerator: Option<bool>,
}

impl AmenityFlags {
    /// All flags unknown, for items whose amenities page never loaded.
    pub fn unknown() -> Self {
        Self {
            kitchen: None,
            wifi: None,
            washer: None,
            tv: None,
            parking: None,
            refrigerator: None,
        }
    }
}

/// Derive the tracked flags from the amenity blob.
pub fn classify(amenities: &str) -> AmenityFlags {
    if amenities.trim().is_empty() {
        return AmenityFlags::unknown();
    }

    AmenityFlags {
        kitchen: Some(present(amenities, "Kitchen")),
        wifi: Some(present(amenities, "Wifi")),
        washer: Some(present(amenities, "Washer")),
        tv: Some(present(amenities, "TV")),
        parking: Some(present(amenities, "Free parking on premises")),
        refrigerator: Some(present(amenities, "Refrigerator")),
    }
}

fn present(amenities: &str, name: &str) -> bool {
    amenities.contains(name) && !amenities.contains(&format!("Unavailable: {name}"))
}
