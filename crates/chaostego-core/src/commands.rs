use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::ImageFormat;
use log::{error, info};

use crate::chaos::{ChaoticParameters, ImageCipher};
use crate::media::{Carrier, EmbedReport, MediaCodecs, Steganographer};
use crate::{ChaostegoError, CodecOptions};

/// Label of a cipher run, both run the very same transform.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => write!(f, "encrypt"),
            Direction::Decrypt => write!(f, "decrypt"),
        }
    }
}

pub fn encrypt(
    image: &Path,
    write_to_file: &Path,
    params: &ChaoticParameters,
) -> Result<(), ChaostegoError> {
    transform(image, write_to_file, params, Direction::Encrypt)
}

pub fn decrypt(
    image: &Path,
    write_to_file: &Path,
    params: &ChaoticParameters,
) -> Result<(), ChaostegoError> {
    transform(image, write_to_file, params, Direction::Decrypt)
}

/// Loads any supported image as RGB, XORs it with the keystream and saves it as PNG.
pub fn transform(
    image: &Path,
    write_to_file: &Path,
    params: &ChaoticParameters,
    direction: Direction,
) -> Result<(), ChaostegoError> {
    let pixels = crate::media::image::open(image)?.to_rgb8();
    info!(
        "{direction} {} ({}x{}) with {params}",
        image.display(),
        pixels.width(),
        pixels.height()
    );

    let transformed = ImageCipher::transform(&pixels, params);

    let mut writer = BufWriter::new(
        File::create(write_to_file).map_err(|source| ChaostegoError::WriteError { source })?,
    );
    transformed
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|e| {
            error!("Error saving image file: {e}");
            ChaostegoError::ImageEncodingError
        })
}

pub fn hide(
    media: &Path,
    write_to_file: &Path,
    message: &str,
    opts: &CodecOptions,
    codecs: &MediaCodecs,
) -> Result<EmbedReport, ChaostegoError> {
    let mut carrier = Carrier::open(media, codecs)?;
    info!(
        "hiding {} bytes in {} carrier {}",
        message.len(),
        carrier.kind(),
        media.display()
    );

    carrier.embed(message, write_to_file, opts)
}

pub fn unveil(
    secret_media: &Path,
    opts: &CodecOptions,
    codecs: &MediaCodecs,
) -> Result<String, ChaostegoError> {
    let mut carrier = Carrier::open(secret_media, codecs)?;
    info!("unveiling from {} carrier {}", carrier.kind(), secret_media.display());

    carrier.reveal(opts)
}
