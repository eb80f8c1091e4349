use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geo::CompassDirection;

/// One sample from a track recording, flattened out of the document hierarchy
///
/// `id` is a dense 0-based index in document traversal order across the whole
/// document, not an identifier carried by the source format.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackPoint {
    pub id: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub time: Option<DateTime<Utc>>,
}

impl TrackPoint {
    pub fn new(id: u32, latitude: f64, longitude: f64, time: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            latitude,
            longitude,
            time,
        }
    }

    /// Timestamp rendered as extended ISO-8601, or the empty string
    pub fn time_string(&self) -> String {
        self.time
            .map(|t| t.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
            .unwrap_or_default()
    }
}

/// A retained track point with travel-direction annotations
///
/// `metadata_sentinel` is a fixed placeholder written into the annotated CSV
/// (`frame_id` column). It is never the computed video frame index; that
/// quantity lives in `video_frame_index` and is filled in only during frame
/// synchronization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnnotatedPoint {
    pub point: TrackPoint,
    pub metadata_sentinel: i32,
    pub direction: Option<CompassDirection>,
    pub video_frame_index: Option<i64>,
}

impl AnnotatedPoint {
    /// Direction label, or the empty string for the first point of a sequence
    pub fn direction_str(&self) -> &'static str {
        self.direction.map(|d| d.as_str()).unwrap_or("")
    }

    /// First character of the direction label, or the empty string
    pub fn cardinal_str(&self) -> String {
        self.direction
            .map(|d| d.cardinal().to_string())
            .unwrap_or_default()
    }
}
