//! Core data types for the track-to-frames pipeline

pub mod config;
pub mod point;

pub use config::PipelineConfig;
pub use point::{AnnotatedPoint, TrackPoint};
