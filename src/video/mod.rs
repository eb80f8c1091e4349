//! Video decoding capability
//!
//! The pipeline only needs random access to decoded frames and the stream's
//! frame rate, so the decoder is a small trait. Core logic and tests run
//! against in-memory fakes; the real FFmpeg-backed source lives behind the
//! `ffmpeg` feature. Opening is the constructor, releasing is `Drop`.

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;

use image::RgbImage;

use crate::error::Result;

pub trait FrameSource {
    /// Frames per second as reported by the stream
    fn frame_rate(&self) -> Result<f64>;

    /// Total number of frames in the stream
    fn frame_count(&self) -> Result<u64>;

    /// Position the decoder at the given frame index
    fn seek_to_frame(&mut self, index: u64) -> Result<()>;

    /// Decode exactly one frame at the current position
    fn read_frame(&mut self) -> Result<RgbImage>;
}
