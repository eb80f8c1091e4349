//! Track document parsing
//!
//! Flattens hierarchical track documents into ordered point sequences.

pub mod gpx;

pub use gpx::{flatten_gpx_bytes, flatten_gpx_file};
