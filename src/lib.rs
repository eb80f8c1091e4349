//! GPX Framer Library
//!
//! A Rust library for converting GPS track recordings into CSV exports and
//! time-synchronized, geotagged still images extracted from a companion
//! video. The pipeline flattens a GPX document into an ordered point
//! sequence, decimates it by a minimum-distance rule while annotating travel
//! direction, and maps each retained point onto a video frame index.
//!
//! # Features
//!
//! - **`cli`** (default): Build the command-line interface binary
//! - **`exif`** (default): Embed GPS EXIF metadata into extracted frames
//! - **`ffmpeg`**: FFmpeg-backed video frame source
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Flatten a track and decimate it:
//! ```rust,no_run
//! use gpx_framer::decimate::TrackDecimator;
//! use gpx_framer::parser::flatten_gpx_file;
//! use gpx_framer::types::PipelineConfig;
//! use std::path::Path;
//!
//! let points = flatten_gpx_file(Path::new("ride.gpx")).unwrap();
//! let annotated = TrackDecimator::new(PipelineConfig::default())
//!     .decimate(&points)
//!     .unwrap();
//! println!("Retained {} of {} points", annotated.len(), points.len());
//! ```
//!
//! Run the CSV half of the pipeline:
//! ```rust,no_run
//! use gpx_framer::pipeline::{process_track_file, ExportOptions};
//! use gpx_framer::types::PipelineConfig;
//! use std::path::Path;
//!
//! let options = ExportOptions {
//!     raw_csv: true,
//!     annotated_csv: true,
//!     ..ExportOptions::default()
//! };
//! let (annotated, report) =
//!     process_track_file(Path::new("ride.gpx"), &PipelineConfig::default(), &options).unwrap();
//! println!("Wrote {:?}", report.annotated_csv_path);
//! # let _ = annotated;
//! ```
//!
//! # Public API
//!
//! ## Parsing
//! - [`parser::flatten_gpx_file`] / [`parser::flatten_gpx_bytes`] - Flatten a
//!   GPX document into an ordered [`types::TrackPoint`] sequence
//!
//! ## Core pipeline
//! - [`decimate::TrackDecimator`] - Distance-threshold decimation with
//!   bearing/direction annotation
//! - [`sync::FrameSynchronizer`] - Map point timestamps onto frame indices
//! - [`frames::FrameExtractor`] - Seek and decode single video frames
//! - [`geotag::GeoTagWriter`] - Embed GPS metadata into extracted images
//!
//! ## CSV codec
//! - [`tabular::write_raw_points`] / [`tabular::read_raw_points`]
//! - [`tabular::write_annotated_points`] / [`tabular::read_annotated_points`]
//!
//! ## Orchestration
//! - [`pipeline::process_track_file`] - One GPX file to CSV outputs
//! - [`pipeline::extract_track_frames`] - Retained points to geotagged stills

pub mod decimate;
pub mod error;
pub mod frames;
pub mod geo;
pub mod geotag;
pub mod parser;
pub mod pipeline;
pub mod sync;
pub mod tabular;
pub mod types;
pub mod video;

pub use error::{FramerError, Result};
pub use pipeline::{ExportOptions, ExportReport};
pub use types::{AnnotatedPoint, PipelineConfig, TrackPoint};
