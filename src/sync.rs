//! Mapping point timestamps onto video frame indices
//!
//! The reference time is the timestamp of the first point in the sequence,
//! first by position. Elapsed seconds since the reference times the frame
//! rate, truncated toward zero, gives the frame index. A point whose
//! timestamp precedes the reference yields a negative index; that is a
//! data-integrity signal surfaced to the extractor, not an error here.

use chrono::{DateTime, Utc};

use crate::error::{FramerError, Result};
use crate::types::{AnnotatedPoint, TrackPoint};

#[derive(Debug, Clone)]
pub struct FrameSynchronizer {
    fps: f64,
    reference: DateTime<Utc>,
}

impl FrameSynchronizer {
    /// Build a synchronizer from an explicit reference time
    pub fn new(fps: f64, reference: DateTime<Utc>) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(FramerError::InvalidFrameRate(fps));
        }
        Ok(Self { fps, reference })
    }

    /// Build a synchronizer for a decimated sequence
    ///
    /// Fails with `EmptySequence` when the sequence has no points and with
    /// `MissingTimestamp` when the first point carries no timestamp.
    pub fn for_sequence(points: &[AnnotatedPoint], fps: f64) -> Result<Self> {
        let first = points.first().ok_or(FramerError::EmptySequence)?;
        let reference = first.point.time.ok_or(FramerError::MissingTimestamp {
            point_id: first.point.id,
        })?;
        Self::new(fps, reference)
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Frame index for a point, truncated toward zero
    ///
    /// A point without a timestamp cannot be synchronized; the caller skips
    /// it rather than defaulting.
    pub fn frame_index(&self, point: &TrackPoint) -> Result<i64> {
        let time = point.time.ok_or(FramerError::MissingTimestamp {
            point_id: point.id,
        })?;
        let elapsed = time.signed_duration_since(self.reference);
        let elapsed_secs = elapsed.num_milliseconds() as f64 / 1_000.0;
        Ok((elapsed_secs * self.fps).trunc() as i64)
    }
}
