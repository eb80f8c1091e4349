//! Per-item pipeline orchestration
//!
//! One run handles one GPX track (and optionally its companion video):
//! flatten, export the raw CSV, decimate, export the annotated CSV, then
//! synchronize retained points onto video frames and extract geotagged
//! stills. Runs are sequential and own all of their state; a failed item
//! never aborts the batch, and within an item a per-point extraction failure
//! (missing timestamp, out-of-range seek) is a logged skip.

use std::path::{Path, PathBuf};

use crate::decimate::TrackDecimator;
use crate::error::{FramerError, Result};
use crate::frames::{self, FrameExtractor};
use crate::geotag::GeoTagWriter;
use crate::parser;
use crate::sync::FrameSynchronizer;
use crate::tabular;
use crate::types::{AnnotatedPoint, PipelineConfig};
use crate::video::FrameSource;

/// Options controlling what a run produces
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Write the raw flattened CSV
    pub raw_csv: bool,
    /// Write the decimated, annotated CSV
    pub annotated_csv: bool,
    /// Extract still frames from the companion video
    pub frames: bool,
    /// Embed GPS EXIF metadata into extracted frames
    pub geotag: bool,
    /// Output directory; defaults to the input file's directory
    pub output_dir: Option<PathBuf>,
    /// Override the frame rate reported by the video stream
    pub fps_override: Option<f64>,
    pub debug: bool,
}

/// What a run produced
#[derive(Debug, Default)]
pub struct ExportReport {
    pub raw_csv_path: Option<PathBuf>,
    pub annotated_csv_path: Option<PathBuf>,
    pub points_total: usize,
    pub points_retained: usize,
    pub frames_written: Vec<PathBuf>,
    /// (point id, reason) for every skipped point
    pub frames_skipped: Vec<(u32, String)>,
}

/// Resolve the output directory for an input file
fn output_dir_for(input_path: &Path, options: &ExportOptions) -> PathBuf {
    options
        .output_dir
        .clone()
        .unwrap_or_else(|| input_path.parent().unwrap_or(Path::new(".")).to_path_buf())
}

/// Flatten a GPX file, decimate it, and write the requested CSV outputs
///
/// Fails with `EmptySequence` before any CSV is produced when the document
/// contains no points.
pub fn process_track_file(
    gpx_path: &Path,
    config: &PipelineConfig,
    options: &ExportOptions,
) -> Result<(Vec<AnnotatedPoint>, ExportReport)> {
    let points = parser::flatten_gpx_file(gpx_path)?;
    if points.is_empty() {
        return Err(FramerError::EmptySequence);
    }

    let base_name = gpx_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("track");
    let output_dir = output_dir_for(gpx_path, options);
    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
        if options.debug {
            println!("Created output directory: {output_dir:?}");
        }
    }

    let mut report = ExportReport {
        points_total: points.len(),
        ..ExportReport::default()
    };

    if options.raw_csv {
        let raw_path = output_dir.join(format!("{base_name}.csv"));
        tabular::export_raw_csv(&points, &raw_path)?;
        println!("Exported raw track to: {}", raw_path.display());
        report.raw_csv_path = Some(raw_path);
    }

    let annotated = TrackDecimator::new(*config).decimate(&points)?;
    report.points_retained = annotated.len();
    if options.debug {
        println!(
            "Decimated {} points down to {}",
            points.len(),
            annotated.len()
        );
    }

    if options.annotated_csv {
        let annotated_path = output_dir.join(format!("{base_name}.annotated.csv"));
        tabular::export_annotated_csv(&annotated, &annotated_path)?;
        println!("Exported annotated track to: {}", annotated_path.display());
        report.annotated_csv_path = Some(annotated_path);
    }

    Ok((annotated, report))
}

/// Synchronize retained points to video frames and write geotagged stills
///
/// Per-point failures (missing timestamp, out-of-range seek) are recorded as
/// warnings in the report and the loop continues; any other failure aborts
/// this item. Two points mapping to the same frame index overwrite the same
/// output file; extraction is idempotent per (video, frame index) pair.
pub fn extract_track_frames<S: FrameSource>(
    annotated: &mut [AnnotatedPoint],
    source: S,
    video_path: &Path,
    tagger: Option<&dyn GeoTagWriter>,
    options: &ExportOptions,
    report: &mut ExportReport,
) -> Result<()> {
    let mut extractor = FrameExtractor::new(source);
    let fps = match options.fps_override {
        Some(fps) => fps,
        None => extractor.frame_rate()?,
    };
    let synchronizer = FrameSynchronizer::for_sequence(annotated, fps)?;

    let video_base = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    let output_dir = output_dir_for(video_path, options);
    let frames_dir = output_dir.join(format!("{video_base}_frames"));

    for entry in annotated.iter_mut() {
        let index = match synchronizer.frame_index(&entry.point) {
            Ok(index) => index,
            Err(err @ FramerError::MissingTimestamp { .. }) => {
                eprintln!("Warning: skipping point {}: {}", entry.point.id, err);
                report.frames_skipped.push((entry.point.id, err.to_string()));
                continue;
            }
            Err(err) => return Err(err),
        };
        entry.video_frame_index = Some(index);

        let image = match extractor.extract(index) {
            Ok(image) => image,
            Err(err @ FramerError::SeekOutOfRange { .. }) => {
                eprintln!("Warning: skipping point {}: {}", entry.point.id, err);
                report.frames_skipped.push((entry.point.id, err.to_string()));
                continue;
            }
            Err(err) => return Err(err),
        };

        let frame_path = frames::frame_output_path(&frames_dir, video_path, index);
        frames::save_frame(&image, &frame_path)?;

        if let Some(tagger) = tagger {
            tagger.embed(&frame_path, entry.point.latitude, entry.point.longitude)?;
        }

        if options.debug {
            println!(
                "Point {} -> frame {} -> {}",
                entry.point.id,
                index,
                frame_path.display()
            );
        }
        report.frames_written.push(frame_path);
    }

    println!(
        "Extracted {} frames from {} ({} skipped)",
        report.frames_written.len(),
        video_path.display(),
        report.frames_skipped.len()
    );
    Ok(())
}

/// Locate a companion video next to a GPX file by basename convention
pub fn find_companion_video(gpx_path: &Path) -> Option<PathBuf> {
    const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "MP4", "mov", "avi"];
    let stem = gpx_path.file_stem()?;
    let dir = gpx_path.parent()?;
    for ext in VIDEO_EXTENSIONS {
        let candidate = dir.join(stem).with_extension(ext);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}
