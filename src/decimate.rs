//! Distance-threshold decimation of track point sequences
//!
//! A raw track samples far more densely than one image per point is worth.
//! The decimator keeps a point only once it has moved at least the configured
//! spacing from the last point that was kept, and annotates each kept point
//! with the travel bearing classified into a compass direction.

use crate::error::{FramerError, Result};
use crate::geo::{self, CompassDirection};
use crate::types::{AnnotatedPoint, PipelineConfig, TrackPoint};

/// Greedy single-pass decimator
///
/// The comparison base is always the last *retained* point. Discarded points
/// never become a future comparison base, so a track that doubles back inside
/// the threshold radius keeps collapsing onto the same retained point. A
/// sliding-window variant would produce a different subset.
#[derive(Debug, Clone)]
pub struct TrackDecimator {
    config: PipelineConfig,
}

impl TrackDecimator {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Decimate an ordered point sequence
    ///
    /// The first point is always retained with no direction (there is no
    /// prior point to compare against). Empty input is an error.
    pub fn decimate(&self, points: &[TrackPoint]) -> Result<Vec<AnnotatedPoint>> {
        let first = points.first().ok_or(FramerError::EmptySequence)?;

        let mut retained = Vec::with_capacity(points.len().min(64));
        retained.push(self.annotate(first, None));

        let mut base = first;
        for candidate in &points[1..] {
            let moved = geo::haversine_distance(
                base.latitude,
                base.longitude,
                candidate.latitude,
                candidate.longitude,
                self.config.earth_radius_m,
            );
            if moved >= self.config.min_spacing_m {
                let bearing = geo::initial_bearing(
                    base.latitude,
                    base.longitude,
                    candidate.latitude,
                    candidate.longitude,
                );
                retained.push(self.annotate(candidate, Some(CompassDirection::from_bearing(bearing))));
                base = candidate;
            }
        }

        Ok(retained)
    }

    fn annotate(&self, point: &TrackPoint, direction: Option<CompassDirection>) -> AnnotatedPoint {
        AnnotatedPoint {
            point: point.clone(),
            metadata_sentinel: self.config.frame_id_sentinel,
            direction,
            video_frame_index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn point(id: u32, lat: f64, lon: f64) -> TrackPoint {
        TrackPoint::new(id, lat, lon, Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, id).unwrap()))
    }

    fn decimator() -> TrackDecimator {
        TrackDecimator::new(PipelineConfig::default())
    }

    #[test]
    fn test_empty_input_is_error() {
        let result = decimator().decimate(&[]);
        assert!(matches!(result, Err(FramerError::EmptySequence)));
    }

    #[test]
    fn test_single_point_retained_without_direction() {
        let out = decimator().decimate(&[point(0, 0.0, 0.0)]).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].direction.is_none());
        assert_eq!(out[0].direction_str(), "");
        assert_eq!(out[0].cardinal_str(), "");
        assert_eq!(out[0].metadata_sentinel, i32::MIN);
        assert!(out[0].video_frame_index.is_none());
    }

    #[test]
    fn test_three_point_track_east_then_stationary() {
        // ~11.1 m east (over the 3.96 m threshold), then no movement
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, 0.0, 0.0001),
            point(2, 0.0, 0.0001),
        ];
        let out = decimator().decimate(&points).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].direction_str(), "");
        assert_eq!(out[1].direction_str(), "E");
        assert_eq!(out[1].cardinal_str(), "E");
        assert_eq!(out[1].point.id, 1);
    }

    #[test]
    fn test_retained_points_spaced_at_least_threshold() {
        // Points every ~2.2 m northward; only every other one clears 3.96 m
        let points: Vec<TrackPoint> = (0..10)
            .map(|i| point(i, i as f64 * 0.00002, 0.0))
            .collect();
        let out = decimator().decimate(&points).unwrap();
        assert!(out.len() > 1);
        let config = PipelineConfig::default();
        for pair in out.windows(2) {
            let d = geo::haversine_distance(
                pair[0].point.latitude,
                pair[0].point.longitude,
                pair[1].point.latitude,
                pair[1].point.longitude,
                config.earth_radius_m,
            );
            assert!(d >= config.min_spacing_m - 1e-9, "spacing {d} below threshold");
        }
    }

    #[test]
    fn test_discarded_points_do_not_rebase() {
        // Second point moves 3 m (under threshold), third moves 3 m further.
        // Relative to the retained first point the third has moved ~6 m, so
        // it is kept even though each step alone is under the threshold.
        let step = 3.0 / 111_194.9; // ~3 m of latitude in degrees
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, step, 0.0),
            point(2, 2.0 * step, 0.0),
        ];
        let out = decimator().decimate(&points).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].point.id, 2);
        assert_eq!(out[1].direction_str(), "N");
    }

    #[test]
    fn test_double_back_inside_threshold_collapses() {
        // Oscillation within the threshold radius around the first point
        let wiggle = 1.0 / 111_194.9; // ~1 m
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, wiggle, 0.0),
            point(2, 0.0, 0.0),
            point(3, wiggle, 0.0),
        ];
        let out = decimator().decimate(&points).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_output_ordered_by_original_id() {
        let points: Vec<TrackPoint> = (0..5)
            .map(|i| point(i, i as f64 * 0.001, 0.0))
            .collect();
        let out = decimator().decimate(&points).unwrap();
        let ids: Vec<u32> = out.iter().map(|a| a.point.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_custom_threshold_respected() {
        let config = PipelineConfig {
            min_spacing_m: 50.0,
            ..PipelineConfig::default()
        };
        // ~11.1 m steps: under a 50 m threshold nothing but the first survives
        let points = vec![
            point(0, 0.0, 0.0),
            point(1, 0.0001, 0.0),
            point(2, 0.0002, 0.0),
        ];
        let out = TrackDecimator::new(config).decimate(&points).unwrap();
        assert_eq!(out.len(), 1);
    }
}
