//! FFmpeg-backed frame source
//!
//! Software decoding via ffmpeg-next: open the input, pick the best video
//! stream, feed packets into the decoder, and convert decoded frames to RGB24
//! through a lazily created scaler. Seeks go through the container timestamp
//! with a decoder flush; the next decoded frame is the one handed out.

use std::path::Path;

use ffmpeg_next::ffi;
use image::RgbImage;

use super::FrameSource;
use crate::error::{FramerError, Result};

pub struct FfmpegFrameSource {
    input_ctx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::codec::decoder::Video,
    stream_index: usize,
    /// Created on first frame; the source pixel format is only known then.
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    width: u32,
    height: u32,
    frame_rate: f64,
    frame_count: u64,
    eof_sent: bool,
}

impl FfmpegFrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| FramerError::Video(format!("ffmpeg init: {}", e)))?;

        if !path.exists() {
            return Err(FramerError::Video(format!("video file not found: {:?}", path)));
        }

        let input_ctx = ffmpeg_next::format::input(&path)
            .map_err(|e| FramerError::Video(format!("failed to open {:?}: {}", path, e)))?;

        let stream = input_ctx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| FramerError::Video(format!("no video stream in {:?}", path)))?;
        let stream_index = stream.index();

        let rational_fps = stream.avg_frame_rate();
        let frame_rate = if rational_fps.denominator() > 0 {
            rational_fps.numerator() as f64 / rational_fps.denominator() as f64
        } else {
            0.0
        };

        let stream_frames = stream.frames().max(0) as u64;
        let duration_secs = input_ctx.duration() as f64 / ffi::AV_TIME_BASE as f64;
        let frame_count = if stream_frames == 0 && frame_rate > 0.0 && duration_secs > 0.0 {
            (duration_secs * frame_rate).round() as u64
        } else {
            stream_frames
        };

        let decoder_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
                .map_err(|e| FramerError::Video(format!("decoder context: {}", e)))?;
        let decoder = decoder_ctx
            .decoder()
            .video()
            .map_err(|e| FramerError::Video(format!("failed to open decoder: {}", e)))?;

        let width = decoder.width();
        let height = decoder.height();

        Ok(Self {
            input_ctx,
            decoder,
            stream_index,
            scaler: None,
            width,
            height,
            frame_rate,
            frame_count,
            eof_sent: false,
        })
    }

    /// Core decode loop: receive a frame if one is ready, otherwise feed
    /// packets until the decoder produces one or the input is exhausted.
    fn decode_next(&mut self) -> Result<ffmpeg_next::util::frame::Video> {
        let mut frame = ffmpeg_next::util::frame::Video::empty();
        loop {
            match self.decoder.receive_frame(&mut frame) {
                Ok(()) => return Ok(frame),
                Err(ffmpeg_next::Error::Other { errno: ffi::EAGAIN }) if !self.eof_sent => {}
                Err(ffmpeg_next::Error::Eof)
                | Err(ffmpeg_next::Error::Other { errno: ffi::EAGAIN }) => {
                    return Err(FramerError::Video("end of stream".to_string()));
                }
                Err(e) => return Err(FramerError::Video(format!("decoder error: {}", e))),
            }

            let mut packet = ffmpeg_next::codec::packet::Packet::empty();
            let mut sent = false;
            while packet.read(&mut self.input_ctx).is_ok() {
                if packet.stream() == self.stream_index {
                    self.decoder
                        .send_packet(&packet)
                        .map_err(|e| FramerError::Video(format!("send packet: {}", e)))?;
                    sent = true;
                    break;
                }
            }
            if !sent {
                self.decoder
                    .send_eof()
                    .map_err(|e| FramerError::Video(format!("send EOF: {}", e)))?;
                self.eof_sent = true;
            }
        }
    }

    fn scale_to_rgb(
        &mut self,
        frame: &ffmpeg_next::util::frame::Video,
    ) -> Result<ffmpeg_next::util::frame::Video> {
        if self.scaler.is_none() {
            let scaler = ffmpeg_next::software::scaling::Context::get(
                frame.format(),
                self.width,
                self.height,
                ffmpeg_next::format::Pixel::RGB24,
                self.width,
                self.height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )
            .map_err(|e| FramerError::Video(format!("scaler: {}", e)))?;
            self.scaler = Some(scaler);
        }

        let mut rgb_frame = ffmpeg_next::util::frame::Video::empty();
        self.scaler
            .as_mut()
            .expect("scaler created above")
            .run(frame, &mut rgb_frame)
            .map_err(|e| FramerError::Video(format!("scaler failed: {}", e)))?;
        Ok(rgb_frame)
    }
}

impl FrameSource for FfmpegFrameSource {
    fn frame_rate(&self) -> Result<f64> {
        Ok(self.frame_rate)
    }

    fn frame_count(&self) -> Result<u64> {
        Ok(self.frame_count)
    }

    fn seek_to_frame(&mut self, index: u64) -> Result<()> {
        if self.frame_rate <= 0.0 {
            return Err(FramerError::InvalidFrameRate(self.frame_rate));
        }
        let time_secs = index as f64 / self.frame_rate;
        let timestamp = (time_secs * ffi::AV_TIME_BASE as f64) as i64;
        self.input_ctx
            .seek(timestamp, ..timestamp)
            .map_err(|e| FramerError::Video(format!("seek to frame {}: {}", index, e)))?;
        self.decoder.flush();
        self.eof_sent = false;
        // Pixel format can change across seek points
        self.scaler = None;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<RgbImage> {
        let raw = self.decode_next()?;
        let rgb = self.scale_to_rgb(&raw)?;

        let width = rgb.width();
        let height = rgb.height();
        let stride = rgb.stride(0);
        let data = rgb.data(0);

        // The frame buffer is row-padded; copy row by row into a tightly
        // packed image buffer.
        let row_bytes = width as usize * 3;
        let mut buffer = vec![0u8; row_bytes * height as usize];
        for y in 0..height as usize {
            let src = &data[y * stride..y * stride + row_bytes];
            buffer[y * row_bytes..(y + 1) * row_bytes].copy_from_slice(src);
        }

        RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| FramerError::Video("frame buffer size mismatch".to_string()))
    }
}
