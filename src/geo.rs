//! Great-circle math for track points
//!
//! Pure functions over WGS84 decimal-degree coordinates: haversine distance,
//! initial travel bearing, and bucketing of a bearing into one of the eight
//! compass directions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mean spherical Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinates, using the
/// haversine formula on a sphere of the given radius.
///
/// Inputs are decimal degrees. Identical coordinates yield 0.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_m: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius_m * c
}

/// Initial bearing in degrees from the first coordinate to the second,
/// clockwise from true north, normalized into [0, 360).
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    // atan2 can go negative; add a full turn before the modulus
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// One of the eight compass directions, clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    const LABELS: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Classify a bearing into a 45-degree bucket. Buckets are offset by
    /// -22.5 degrees so that bearing 0 sits at the center of the N bucket.
    pub fn from_bearing(bearing_deg: f64) -> Self {
        let normalized = bearing_deg.rem_euclid(360.0);
        let bucket = ((normalized + 22.5) / 45.0).floor() as usize % 8;
        Self::LABELS[bucket]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassDirection::North => "N",
            CompassDirection::NorthEast => "NE",
            CompassDirection::East => "E",
            CompassDirection::SouthEast => "SE",
            CompassDirection::South => "S",
            CompassDirection::SouthWest => "SW",
            CompassDirection::West => "W",
            CompassDirection::NorthWest => "NW",
        }
    }

    /// First character of the direction label (N/E/S/W)
    pub fn cardinal(&self) -> char {
        // Labels are ASCII, so byte indexing is safe
        self.as_str().as_bytes()[0] as char
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "N" => Some(CompassDirection::North),
            "NE" => Some(CompassDirection::NorthEast),
            "E" => Some(CompassDirection::East),
            "SE" => Some(CompassDirection::SouthEast),
            "S" => Some(CompassDirection::South),
            "SW" => Some(CompassDirection::SouthWest),
            "W" => Some(CompassDirection::West),
            "NW" => Some(CompassDirection::NorthWest),
            _ => None,
        }
    }
}
