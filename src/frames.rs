//! Still-frame extraction and storage
//!
//! Seeks a `FrameSource` to a computed frame index, decodes one frame, and
//! writes it as a JPEG under a deterministic name derived from the source
//! video's base name and the frame index. Writing the same (video, frame)
//! pair twice overwrites the previous file, so extraction is idempotent.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, RgbImage};

use crate::error::{FramerError, Result};
use crate::video::FrameSource;

/// Fixed JPEG quality for extracted stills
const JPEG_QUALITY: u8 = 95;

pub struct FrameExtractor<S: FrameSource> {
    source: S,
}

impl<S: FrameSource> FrameExtractor<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Frame rate of the underlying stream
    pub fn frame_rate(&self) -> Result<f64> {
        let fps = self.source.frame_rate()?;
        if !fps.is_finite() || fps <= 0.0 {
            return Err(FramerError::InvalidFrameRate(fps));
        }
        Ok(fps)
    }

    /// Seek to `index` and decode exactly one frame
    ///
    /// A negative index (point timestamped before the reference) or an index
    /// past the end of the stream fails with `SeekOutOfRange`; the caller
    /// treats that as a per-point skip, not a batch abort.
    pub fn extract(&mut self, index: i64) -> Result<RgbImage> {
        let frame_count = self.source.frame_count()?;
        if index < 0 || index as u64 >= frame_count {
            return Err(FramerError::SeekOutOfRange { index, frame_count });
        }
        self.source.seek_to_frame(index as u64)?;
        self.source.read_frame()
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

/// Deterministic output name for an extracted frame: `{video_base}_{index}.jpg`
pub fn frame_output_path(frames_dir: &Path, video_path: &Path, index: i64) -> PathBuf {
    let base = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("video");
    frames_dir.join(format!("{base}_{index}.jpg"))
}

/// Write a decoded frame to disk as a high-quality JPEG, overwriting any
/// previous file at the same path
pub fn save_frame(image: &RgbImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(output_path)
        .map_err(|e| FramerError::Export(format!("failed to create {:?}: {}", output_path, e)))?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| FramerError::Export(format!("failed to encode {:?}: {}", output_path, e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory frame source: every frame is a solid color keyed by index
    struct FakeSource {
        frame_count: u64,
        fps: f64,
        position: u64,
    }

    impl FakeSource {
        fn new(frame_count: u64, fps: f64) -> Self {
            Self {
                frame_count,
                fps,
                position: 0,
            }
        }
    }

    impl FrameSource for FakeSource {
        fn frame_rate(&self) -> Result<f64> {
            Ok(self.fps)
        }

        fn frame_count(&self) -> Result<u64> {
            Ok(self.frame_count)
        }

        fn seek_to_frame(&mut self, index: u64) -> Result<()> {
            self.position = index;
            Ok(())
        }

        fn read_frame(&mut self) -> Result<RgbImage> {
            let shade = (self.position % 256) as u8;
            self.position += 1;
            Ok(RgbImage::from_pixel(4, 4, image::Rgb([shade, shade, shade])))
        }
    }

    #[test]
    fn test_extract_in_range() {
        let mut extractor = FrameExtractor::new(FakeSource::new(100, 30.0));
        let frame = extractor.extract(42).unwrap();
        assert_eq!(frame.get_pixel(0, 0).0[0], 42);
    }

    #[test]
    fn test_negative_index_rejected() {
        let mut extractor = FrameExtractor::new(FakeSource::new(100, 30.0));
        match extractor.extract(-5) {
            Err(FramerError::SeekOutOfRange { index, frame_count }) => {
                assert_eq!(index, -5);
                assert_eq!(frame_count, 100);
            }
            other => panic!("expected SeekOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_index_past_end_rejected() {
        let mut extractor = FrameExtractor::new(FakeSource::new(100, 30.0));
        assert!(matches!(
            extractor.extract(100),
            Err(FramerError::SeekOutOfRange { .. })
        ));
        assert!(extractor.extract(99).is_ok());
    }

    #[test]
    fn test_bad_frame_rate_surfaces() {
        let extractor = FrameExtractor::new(FakeSource::new(100, 0.0));
        assert!(matches!(
            extractor.frame_rate(),
            Err(FramerError::InvalidFrameRate(_))
        ));
    }

    #[test]
    fn test_frame_output_path_name() {
        let path = frame_output_path(Path::new("/out"), Path::new("/videos/ride.mp4"), 25);
        assert_eq!(path, PathBuf::from("/out/ride_25.jpg"));
    }

    #[test]
    fn test_save_frame_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_0.jpg");

        let dark = RgbImage::from_pixel(4, 4, image::Rgb([10, 10, 10]));
        let light = RgbImage::from_pixel(4, 4, image::Rgb([200, 200, 200]));

        save_frame(&dark, &path).unwrap();
        let first_len = std::fs::metadata(&path).unwrap().len();
        save_frame(&light, &path).unwrap();

        // Still a single file, freshly rewritten
        assert!(path.exists());
        assert!(first_len > 0);
        let reopened = image::open(&path).unwrap().to_rgb8();
        assert!(reopened.get_pixel(0, 0).0[0] > 100);
    }
}
