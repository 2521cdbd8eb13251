use image::RgbImage;
use log::debug;

use super::{ChaoticParameters, Keystream};

/// XOR cipher over the flattened RGB bytes of an image.
///
/// Applying it twice with the same parameters yields the original image, so there
/// is no difference between encrypting and decrypting.
///
/// ## Example of usage
/// ```rust
/// use chaostego_core::chaos::{ChaoticParameters, ImageCipher};
/// use image::RgbImage;
///
/// let plain = RgbImage::from_fn(2, 2, |x, y| image::Rgb([x as u8, y as u8, 42]));
/// let params = ChaoticParameters::default();
///
/// let encrypted = ImageCipher::transform(&plain, &params);
/// assert_ne!(encrypted, plain);
/// assert_eq!(ImageCipher::transform(&encrypted, &params), plain);
/// ```
pub struct ImageCipher;

impl ImageCipher {
    pub fn transform(pixels: &RgbImage, params: &ChaoticParameters) -> RgbImage {
        let mut out = pixels.clone();
        Self::transform_in_place(&mut out, params);
        out
    }

    pub fn transform_in_place(pixels: &mut RgbImage, params: &ChaoticParameters) {
        debug!(
            "transforming {}x{} image with {params:?}",
            pixels.width(),
            pixels.height()
        );
        Self::transform_bytes(pixels, params);
    }

    /// Row major `H x W x 3` bytes, the keystream covers exactly `bytes.len()` bytes.
    pub fn transform_bytes(bytes: &mut [u8], params: &ChaoticParameters) {
        bytes
            .iter_mut()
            .zip(Keystream::new(params))
            .for_each(|(b, k)| *b ^= k);
    }
}
