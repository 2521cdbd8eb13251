use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::RgbImage;
use log::debug;

use super::{FrameSink, FrameSource, VideoCodec, VideoSpec};
use crate::error::ChaostegoError;
use crate::media::CarrierKind;
use crate::result::Result;

/// Frames held in memory, handed out one by one as a [`FrameSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    spec: VideoSpec,
    frames: VecDeque<RgbImage>,
}

impl FrameSequence {
    pub fn new(spec: VideoSpec, frames: Vec<RgbImage>) -> Result<Self> {
        if let Some((i, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| f.dimensions() != (spec.width, spec.height))
        {
            return Err(ChaostegoError::CarrierOpenFailure {
                kind: CarrierKind::Video,
                reason: format!(
                    "frame {i} is {}x{}, expected {}x{}",
                    frame.width(),
                    frame.height(),
                    spec.width,
                    spec.height
                ),
            });
        }

        Ok(Self {
            spec,
            frames: frames.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> impl Iterator<Item = &RgbImage> {
        self.frames.iter()
    }
}

impl FrameSource for FrameSequence {
    fn spec(&self) -> VideoSpec {
        self.spec
    }

    fn frame_count(&self) -> Option<usize> {
        Some(self.frames.len())
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        Ok(self.frames.pop_front())
    }
}

/// Collects written frames, see [`FrameSequenceSink::into_sequence`].
#[derive(Debug)]
pub struct FrameSequenceSink {
    spec: VideoSpec,
    frames: Vec<RgbImage>,
}

impl FrameSequenceSink {
    pub fn new(spec: VideoSpec) -> Self {
        Self {
            spec,
            frames: Vec::new(),
        }
    }

    pub fn into_sequence(self) -> Result<FrameSequence> {
        FrameSequence::new(self.spec, self.frames)
    }
}

impl FrameSink for FrameSequenceSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != (self.spec.width, self.spec.height) {
            return Err(ChaostegoError::VideoEncodingError(format!(
                "frame is {}x{}, the output is {}x{}",
                frame.width(),
                frame.height(),
                self.spec.width,
                self.spec.height
            )));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

type Store = Arc<Mutex<HashMap<PathBuf, FrameSequence>>>;

/// A [`VideoCodec`] that keeps "files" in a shared map instead of on disk.
///
/// Clones share the same store. A video only shows up once its sink was finished.
#[derive(Debug, Clone, Default)]
pub struct MemoryVideoCodec {
    store: Store,
}

impl MemoryVideoCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl AsRef<Path>, video: FrameSequence) -> Result<()> {
        lock(&self.store)?.insert(path.as_ref().to_path_buf(), video);
        Ok(())
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Result<Option<FrameSequence>> {
        Ok(lock(&self.store)?.get(path.as_ref()).cloned())
    }
}

fn lock(store: &Store) -> Result<std::sync::MutexGuard<'_, HashMap<PathBuf, FrameSequence>>> {
    store
        .lock()
        .map_err(|_| ChaostegoError::VideoEncodingError("video store is poisoned".to_string()))
}

impl VideoCodec for MemoryVideoCodec {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        match self.get(path)? {
            Some(video) => Ok(Box::new(video)),
            None => Err(ChaostegoError::CarrierOpenFailure {
                kind: CarrierKind::Video,
                reason: format!("no video stored at {path:?}"),
            }),
        }
    }

    fn create(&self, path: &Path, spec: VideoSpec) -> Result<Box<dyn FrameSink>> {
        Ok(Box::new(MemorySink {
            path: path.to_path_buf(),
            inner: FrameSequenceSink::new(spec),
            store: self.store.clone(),
        }))
    }

    fn discard(&self, path: &Path) -> Result<()> {
        lock(&self.store)?.remove(path);
        Ok(())
    }
}

struct MemorySink {
    path: PathBuf,
    inner: FrameSequenceSink,
    store: Store,
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        self.inner.write_frame(frame)
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let MemorySink { path, inner, store } = *self;
        let video = inner.into_sequence()?;
        debug!("stored {} frames at {path:?}", video.len());
        lock(&store)?.insert(path, video);
        Ok(())
    }
}
