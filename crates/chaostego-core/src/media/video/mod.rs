//! Video carriers are streamed frame by frame through an injected [`VideoCodec`].
//!
//! The crate ships [`AviCodec`] for uncompressed AVI files, plus an in-memory
//! [`FrameSequence`] and a [`MemoryVideoCodec`] built on top of it. Compressed
//! containers need a [`VideoCodec`] from elsewhere.

pub mod avi;
mod frame_sequence;
pub mod lsb_codec;

use std::path::Path;

use image::RgbImage;

use crate::result::Result;

pub use avi::AviCodec;
pub use frame_sequence::{FrameSequence, FrameSequenceSink, MemoryVideoCodec};
pub use lsb_codec::{LsbCodec, VideoSteganographer};

/// Used when a container does not report a usable frame rate.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoSpec {
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
}

impl VideoSpec {
    pub fn new(width: u32, height: u32, frame_rate: f64) -> Self {
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };

        Self {
            width,
            height,
            frame_rate,
        }
    }

    /// Samples of one color plane, i.e. message bits per frame.
    pub fn plane_capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Decoded frames in presentation order, RGB channel order.
pub trait FrameSource {
    fn spec(&self) -> VideoSpec;

    /// Number of frames if the container knows it up front.
    fn frame_count(&self) -> Option<usize> {
        None
    }

    /// `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

pub trait FrameSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()>;

    /// Flushes and closes the output. A sink that is dropped without calling
    /// `finish` must not leave a valid looking output behind.
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Access to a video container format, one fixed codec for writing.
pub trait VideoCodec: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>>;

    fn create(&self, path: &Path, spec: VideoSpec) -> Result<Box<dyn FrameSink>>;

    /// Removes whatever a failed `create` + `write_frame` run left at `path`.
    fn discard(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
