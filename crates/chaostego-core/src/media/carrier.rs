use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use image::{ImageFormat, RgbaImage};
use log::{debug, error, info};

use crate::error::ChaostegoError;
use crate::media::audio::{AudioSteganographer, PcmAudio};
use crate::media::image::{ImageHider, LsbImageHider};
use crate::media::video::{FrameSource, VideoCodec, VideoSteganographer};
use crate::media::{CarrierKind, CodecOptions, EmbedReport, MarkerPolicy};
use crate::result::Result;

/// The collaborators a carrier needs beyond the audio codec, which is built in.
#[derive(Clone)]
pub struct MediaCodecs {
    pub image_hider: Arc<dyn ImageHider>,
    pub video_codec: Option<Arc<dyn VideoCodec>>,
}

impl Default for MediaCodecs {
    fn default() -> Self {
        Self {
            image_hider: Arc::new(LsbImageHider),
            video_codec: None,
        }
    }
}

impl MediaCodecs {
    pub fn with_image_hider(mut self, hider: Arc<dyn ImageHider>) -> Self {
        self.image_hider = hider;
        self
    }

    pub fn with_video_codec(mut self, codec: Arc<dyn VideoCodec>) -> Self {
        self.video_codec = Some(codec);
        self
    }
}

#[enum_dispatch]
pub trait Steganographer {
    fn kind(&self) -> CarrierKind;

    /// Hides `message` and writes the modified carrier to `target`.
    fn embed(&mut self, message: &str, target: &Path, opts: &CodecOptions) -> Result<EmbedReport>;

    fn reveal(&mut self, opts: &CodecOptions) -> Result<String>;
}

#[enum_dispatch(Steganographer)]
pub enum Carrier {
    ImageCarrier,
    AudioCarrier,
    VideoCarrier,
}

impl Carrier {
    /// Opens `path` as whatever its extension says it is.
    pub fn open(path: &Path, codecs: &MediaCodecs) -> Result<Self> {
        let kind = CarrierKind::from_path(path)?;
        debug!("Opening {} as {kind} carrier", path.display());

        Ok(match kind {
            CarrierKind::Image => {
                let image = crate::media::image::open(path)?;
                ImageCarrier::new(image.to_rgba8(), codecs.image_hider.clone()).into()
            }
            CarrierKind::Audio => AudioCarrier::new(PcmAudio::from_file(path)?).into(),
            CarrierKind::Video => {
                let codec = codecs.video_codec.clone().ok_or_else(|| {
                    ChaostegoError::VideoCodecMissing(path.display().to_string())
                })?;
                let source = codec.open(path)?;
                VideoCarrier::new(source, codec).into()
            }
        })
    }
}

pub struct ImageCarrier {
    image: RgbaImage,
    hider: Arc<dyn ImageHider>,
}

impl ImageCarrier {
    pub fn new(image: RgbaImage, hider: Arc<dyn ImageHider>) -> Self {
        Self { image, hider }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

impl Steganographer for ImageCarrier {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Image
    }

    /// The target is always written as PNG, lossy formats would destroy the bits.
    fn embed(&mut self, message: &str, target: &Path, opts: &CodecOptions) -> Result<EmbedReport> {
        let report = self.hider.hide(&mut self.image, message, opts)?;
        let mut writer = BufWriter::new(
            File::create(target).map_err(|source| ChaostegoError::WriteError { source })?,
        );
        self.image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| {
                error!("Error saving image file: {e}");
                ChaostegoError::ImageEncodingError
            })?;
        info!("Saved stego image to {}", target.display());

        Ok(report)
    }

    fn reveal(&mut self, opts: &CodecOptions) -> Result<String> {
        match self.hider.reveal(&self.image, opts)? {
            Some(message) => Ok(message),
            None if opts.marker == MarkerPolicy::Strict => Err(ChaostegoError::MarkerNotFound),
            None => Ok(String::new()),
        }
    }
}

pub struct AudioCarrier {
    audio: PcmAudio,
}

impl AudioCarrier {
    pub fn new(audio: PcmAudio) -> Self {
        Self { audio }
    }

    pub fn audio(&self) -> &PcmAudio {
        &self.audio
    }
}

impl Steganographer for AudioCarrier {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Audio
    }

    fn embed(&mut self, message: &str, target: &Path, opts: &CodecOptions) -> Result<EmbedReport> {
        let report = AudioSteganographer::embed(&mut self.audio, message, opts)?;
        self.audio.save_as(target)?;
        info!("Saved stego audio to {}", target.display());

        Ok(report)
    }

    fn reveal(&mut self, opts: &CodecOptions) -> Result<String> {
        AudioSteganographer::reveal(&self.audio, opts)
    }
}

/// A video carrier can be walked only once, it is a stream of frames.
pub struct VideoCarrier {
    source: Box<dyn FrameSource>,
    codec: Arc<dyn VideoCodec>,
}

impl VideoCarrier {
    pub fn new(source: Box<dyn FrameSource>, codec: Arc<dyn VideoCodec>) -> Self {
        Self { source, codec }
    }
}

impl Steganographer for VideoCarrier {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Video
    }

    fn embed(&mut self, message: &str, target: &Path, opts: &CodecOptions) -> Result<EmbedReport> {
        let mut sink = self.codec.create(target, self.source.spec())?;
        let report = match VideoSteganographer::embed(self.source.as_mut(), sink.as_mut(), message, opts)
        {
            Ok(report) => report,
            Err(e) => {
                drop(sink);
                if let Err(cleanup) = self.codec.discard(target) {
                    error!("Could not remove partial video {}: {cleanup}", target.display());
                }
                return Err(e);
            }
        };
        sink.finish()?;
        info!("Saved stego video to {}", target.display());

        Ok(report)
    }

    fn reveal(&mut self, opts: &CodecOptions) -> Result<String> {
        VideoSteganographer::reveal(self.source.as_mut(), opts)
    }
}
