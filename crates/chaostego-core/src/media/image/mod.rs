mod iterators;
pub mod lsb_codec;

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::error::ChaostegoError;
use crate::media::{CarrierKind, CodecOptions, EmbedReport};
use crate::result::Result;

pub use lsb_codec::LsbImageHider;

/// Still image steganography, a replaceable capability.
///
/// Implementations use their own payload framing, the end marker of the
/// audio and video carriers does not apply here.
pub trait ImageHider: Send + Sync {
    fn hide(&self, image: &mut RgbaImage, message: &str, opts: &CodecOptions)
        -> Result<EmbedReport>;

    /// `None` if the image does not carry a message.
    fn reveal(&self, image: &RgbaImage, opts: &CodecOptions) -> Result<Option<String>>;
}

/// Decodes the image at `path` by looking at its bytes, the extension is only a fallback.
///
/// Images are always written as PNG, so a `.jpg` or `.bmp` name may well hold PNG data.
pub fn open(path: &Path) -> Result<DynamicImage> {
    let failure = |reason: String| ChaostegoError::CarrierOpenFailure {
        kind: CarrierKind::Image,
        reason,
    };

    image::io::Reader::open(path)
        .map_err(|e| failure(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| failure(e.to_string()))?
        .decode()
        .map_err(|e| failure(e.to_string()))
}
