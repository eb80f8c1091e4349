#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geo::EARTH_RADIUS_M;

/// Minimum distance a point must move before it is retained, in feet
pub const DISTANCE_THRESHOLD_FEET: f64 = 13.0;

/// International foot in meters
pub const FEET_TO_METERS: f64 = 0.3048;

/// Placeholder written to the `frame_id` CSV column of every retained point
pub const FRAME_ID_SENTINEL: i32 = i32::MIN;

/// Immutable pipeline constants, passed in at construction
///
/// Kept as a value rather than process-wide statics so runs with different
/// thresholds can coexist in the same process.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    /// Decimation spacing threshold in meters
    pub min_spacing_m: f64,
    /// Spherical Earth radius used for distance computation, in meters
    pub earth_radius_m: f64,
    /// Sentinel value for the `frame_id` column of annotated output
    pub frame_id_sentinel: i32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_spacing_m: DISTANCE_THRESHOLD_FEET * FEET_TO_METERS,
            earth_radius_m: EARTH_RADIUS_M,
            frame_id_sentinel: FRAME_ID_SENTINEL,
        }
    }
}
