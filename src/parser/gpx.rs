//! GPX track flattening
//!
//! A GPX document nests points as tracks → segments → points. The pipeline
//! works on a single flat, ordered sequence, so the parser walks the document
//! in traversal order (track, then segment, then point) and assigns each
//! point a running 0-based id across the whole document. The counter is not
//! reset per track or segment.

use std::io::Cursor;
use std::path::Path;

use chrono::{DateTime, Utc};
use gpx::Waypoint;

use crate::error::{FramerError, Result};
use crate::types::TrackPoint;

/// Parse GPX bytes and flatten them into an ordered point sequence
///
/// Fails with `Encoding` when the bytes are not valid UTF-8 and with `Parse`
/// when the document is not well-formed GPX. A point without a `<time>`
/// element yields `time: None`, not an error.
pub fn flatten_gpx_bytes(bytes: &[u8]) -> Result<Vec<TrackPoint>> {
    let text = std::str::from_utf8(bytes)?;

    let document =
        gpx::read(Cursor::new(text)).map_err(|e| FramerError::Parse(e.to_string()))?;

    let mut points = Vec::new();
    let mut next_id: u32 = 0;

    for track in &document.tracks {
        for segment in &track.segments {
            for waypoint in &segment.points {
                let position = waypoint.point();
                points.push(TrackPoint::new(
                    next_id,
                    position.y(), // latitude
                    position.x(), // longitude
                    waypoint_time(waypoint)?,
                ));
                next_id += 1;
            }
        }
    }

    Ok(points)
}

/// Read and flatten a GPX file from disk
pub fn flatten_gpx_file(path: &Path) -> Result<Vec<TrackPoint>> {
    let bytes = std::fs::read(path)?;
    flatten_gpx_bytes(&bytes)
}

fn waypoint_time(waypoint: &Waypoint) -> Result<Option<DateTime<Utc>>> {
    match &waypoint.time {
        Some(time) => {
            let formatted = time
                .format()
                .map_err(|e| FramerError::Parse(format!("bad point timestamp: {}", e)))?;
            let parsed = DateTime::parse_from_rfc3339(&formatted)
                .map_err(|e| FramerError::Parse(format!("bad point timestamp: {}", e)))?;
            Ok(Some(parsed.with_timezone(&Utc)))
        }
        None => Ok(None),
    }
}
