//! Row-oriented CSV encoding and decoding of point sequences
//!
//! Two fixed column schemas are supported: the raw flattened track and the
//! decimated, direction-annotated track. Encoding renders values exactly as
//! the in-memory model does (timestamps as extended ISO-8601 or an empty
//! string). Decoding requires the exact header row and coerces numeric and
//! temporal fields, failing with `FieldFormat` rather than trusting the
//! formatting of untrusted input.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{FramerError, Result};
use crate::geo::CompassDirection;
use crate::types::{AnnotatedPoint, TrackPoint};

/// Columns of the raw flattened track schema
pub const RAW_HEADERS: [&str; 4] = ["trkpt_id", "frame_latitude", "frame_longitude", "frame_time"];

/// Columns of the annotated (decimated) track schema
pub const ANNOTATED_HEADERS: [&str; 7] = [
    "trkpt_id",
    "frame_latitude",
    "frame_longitude",
    "frame_time",
    "frame_id",
    "direction",
    "cardinal_direction",
];

/// Write the raw schema, one row per point
pub fn write_raw_points<W: io::Write>(points: &[TrackPoint], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(RAW_HEADERS)?;
    for point in points {
        csv_writer.write_record([
            point.id.to_string(),
            point.latitude.to_string(),
            point.longitude.to_string(),
            point.time_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the annotated schema, one row per retained point
pub fn write_annotated_points<W: io::Write>(points: &[AnnotatedPoint], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(ANNOTATED_HEADERS)?;
    for annotated in points {
        csv_writer.write_record([
            annotated.point.id.to_string(),
            annotated.point.latitude.to_string(),
            annotated.point.longitude.to_string(),
            annotated.point.time_string(),
            annotated.metadata_sentinel.to_string(),
            annotated.direction_str().to_string(),
            annotated.cardinal_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read the raw schema back into typed points
pub fn read_raw_points<R: io::Read>(reader: R) -> Result<Vec<TrackPoint>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    check_headers(&mut csv_reader, &RAW_HEADERS)?;

    let mut points = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        points.push(point_from_fields(
            &record[0], &record[1], &record[2], &record[3],
        )?);
    }
    Ok(points)
}

/// Read the annotated schema back into typed points
///
/// The `cardinal_direction` column is derived from `direction` and is not
/// independently decoded.
pub fn read_annotated_points<R: io::Read>(reader: R) -> Result<Vec<AnnotatedPoint>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    check_headers(&mut csv_reader, &ANNOTATED_HEADERS)?;

    let mut points = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let point = point_from_fields(&record[0], &record[1], &record[2], &record[3])?;
        let sentinel = parse_field::<i32>("frame_id", &record[4])?;
        let direction = match &record[5] {
            "" => None,
            label => Some(CompassDirection::from_str_opt(label).ok_or_else(|| {
                FramerError::FieldFormat {
                    column: "direction".to_string(),
                    value: label.to_string(),
                }
            })?),
        };
        points.push(AnnotatedPoint {
            point,
            metadata_sentinel: sentinel,
            direction,
            video_frame_index: None,
        });
    }
    Ok(points)
}

/// Write the raw schema to a file, creating parent directories as needed
pub fn export_raw_csv(points: &[TrackPoint], output_path: &Path) -> Result<()> {
    create_parent_dir(output_path)?;
    let file = std::fs::File::create(output_path)
        .map_err(|e| FramerError::Export(format!("failed to create {:?}: {}", output_path, e)))?;
    write_raw_points(points, io::BufWriter::new(file))
}

/// Write the annotated schema to a file, creating parent directories as needed
pub fn export_annotated_csv(points: &[AnnotatedPoint], output_path: &Path) -> Result<()> {
    create_parent_dir(output_path)?;
    let file = std::fs::File::create(output_path)
        .map_err(|e| FramerError::Export(format!("failed to create {:?}: {}", output_path, e)))?;
    write_annotated_points(points, io::BufWriter::new(file))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn check_headers<R: io::Read>(reader: &mut csv::Reader<R>, expected: &[&str]) -> Result<()> {
    let headers = reader.headers()?;
    let actual: Vec<&str> = headers.iter().collect();
    if actual != expected {
        return Err(FramerError::Schema(format!(
            "expected columns {:?}, found {:?}",
            expected, actual
        )));
    }
    Ok(())
}

fn point_from_fields(id: &str, latitude: &str, longitude: &str, time: &str) -> Result<TrackPoint> {
    Ok(TrackPoint::new(
        parse_field::<u32>("trkpt_id", id)?,
        parse_field::<f64>("frame_latitude", latitude)?,
        parse_field::<f64>("frame_longitude", longitude)?,
        parse_time_field(time)?,
    ))
}

fn parse_field<T: std::str::FromStr>(column: &str, value: &str) -> Result<T> {
    value.parse::<T>().map_err(|_| FramerError::FieldFormat {
        column: column.to_string(),
        value: value.to_string(),
    })
}

fn parse_time_field(value: &str) -> Result<Option<DateTime<Utc>>> {
    if value.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|_| FramerError::FieldFormat {
            column: "frame_time".to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimate::TrackDecimator;
    use crate::types::PipelineConfig;
    use chrono::TimeZone;

    fn sample_points() -> Vec<TrackPoint> {
        vec![
            TrackPoint::new(0, 0.0, 0.0, Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap())),
            TrackPoint::new(1, 0.0, 0.0001, Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 1).unwrap())),
            TrackPoint::new(2, 0.0001, 0.0001, None),
        ]
    }

    #[test]
    fn test_raw_round_trip() {
        let points = sample_points();
        let mut buffer = Vec::new();
        write_raw_points(&points, &mut buffer).unwrap();

        let decoded = read_raw_points(buffer.as_slice()).unwrap();
        assert_eq!(decoded, points);
    }

    #[test]
    fn test_raw_header_row_exact() {
        let mut buffer = Vec::new();
        write_raw_points(&sample_points(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, "trkpt_id,frame_latitude,frame_longitude,frame_time");
    }

    #[test]
    fn test_annotated_round_trip() {
        let annotated = TrackDecimator::new(PipelineConfig::default())
            .decimate(&sample_points())
            .unwrap();
        let mut buffer = Vec::new();
        write_annotated_points(&annotated, &mut buffer).unwrap();

        let decoded = read_annotated_points(buffer.as_slice()).unwrap();
        assert_eq!(decoded.len(), annotated.len());
        for (a, b) in annotated.iter().zip(&decoded) {
            assert_eq!(a.point, b.point);
            assert_eq!(a.metadata_sentinel, b.metadata_sentinel);
            assert_eq!(a.direction, b.direction);
        }
    }

    #[test]
    fn test_sentinel_written_to_frame_id_column() {
        let annotated = TrackDecimator::new(PipelineConfig::default())
            .decimate(&sample_points())
            .unwrap();
        let mut buffer = Vec::new();
        write_annotated_points(&annotated, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let second_line = text.lines().nth(1).unwrap();
        assert!(second_line.contains("-2147483648"), "{second_line}");
    }

    #[test]
    fn test_empty_time_round_trips_as_none() {
        let mut buffer = Vec::new();
        write_raw_points(&sample_points(), &mut buffer).unwrap();
        let decoded = read_raw_points(buffer.as_slice()).unwrap();
        assert!(decoded[2].time.is_none());
    }

    #[test]
    fn test_wrong_header_is_schema_error() {
        let csv = "id,lat,lon,time\n0,1.0,2.0,\n";
        let result = read_raw_points(csv.as_bytes());
        assert!(matches!(result, Err(FramerError::Schema(_))));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let csv = "trkpt_id,frame_latitude,frame_longitude\n0,1.0,2.0\n";
        let result = read_raw_points(csv.as_bytes());
        assert!(matches!(result, Err(FramerError::Schema(_))));
    }

    #[test]
    fn test_bad_coordinate_is_field_format_error() {
        let csv = "trkpt_id,frame_latitude,frame_longitude,frame_time\n0,not-a-number,2.0,\n";
        let result = read_raw_points(csv.as_bytes());
        match result {
            Err(FramerError::FieldFormat { column, value }) => {
                assert_eq!(column, "frame_latitude");
                assert_eq!(value, "not-a-number");
            }
            other => panic!("expected FieldFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_direction_is_field_format_error() {
        let csv = "trkpt_id,frame_latitude,frame_longitude,frame_time,frame_id,direction,cardinal_direction\n\
                   0,1.0,2.0,,-2147483648,XX,X\n";
        let result = read_annotated_points(csv.as_bytes());
        assert!(matches!(result, Err(FramerError::FieldFormat { .. })));
    }

    #[test]
    fn test_header_only_decodes_to_empty() {
        // Row count handling is the caller's concern (EmptySequence upstream)
        let csv = "trkpt_id,frame_latitude,frame_longitude,frame_time\n";
        let decoded = read_raw_points(csv.as_bytes()).unwrap();
        assert!(decoded.is_empty());
    }
}
