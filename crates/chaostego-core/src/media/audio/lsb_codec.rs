use log::{debug, info};

use super::PcmAudio;
use crate::bitstream::{self, Decoded};
use crate::media::{
    check_capacity, conclude_reveal, hide_bits, unveil_bits, CodecOptions, EmbedReport,
    MediaPrimitive, MediaPrimitiveMut,
};
use crate::result::Result;

/// Factory for the carrier primitives of raw audio frame bytes
pub struct LsbCodec;

impl LsbCodec {
    /// every frame byte carries one bit in its least significant bit
    pub fn decoder(frames: &[u8]) -> impl Iterator<Item = bool> + '_ {
        unveil_bits(frames.iter().copied().map(MediaPrimitive::AudioFrameByte))
    }

    pub fn encoder(frames: &mut [u8]) -> impl Iterator<Item = MediaPrimitiveMut<'_>> {
        frames.iter_mut().map(MediaPrimitiveMut::AudioFrameByte)
    }
}

/// Hides text messages in the frame bytes of PCM audio.
pub struct AudioSteganographer;

impl AudioSteganographer {
    /// Overwrites the least significant bit of the first `8 * len + 16` frame bytes.
    pub fn embed(audio: &mut PcmAudio, message: &str, opts: &CodecOptions) -> Result<EmbedReport> {
        let bits = bitstream::encode(message);
        check_capacity(bits.len(), audio.capacity(), opts.capacity)?;

        let written = hide_bits(LsbCodec::encoder(audio.frames_mut()), bits.iter());
        let report = EmbedReport::new(bits.len(), written);
        report.warn_if_truncated("audio");
        info!(
            "hid {} of {} bits in {} audio frame bytes",
            report.written_bits,
            report.needed_bits,
            audio.capacity()
        );

        Ok(report)
    }

    pub fn reveal(audio: &PcmAudio, opts: &CodecOptions) -> Result<String> {
        let decoded: Decoded = bitstream::decode(LsbCodec::decoder(audio.frames()), None);
        debug!(
            "read {} bits from {} audio frame bytes",
            decoded.consumed_bits,
            audio.capacity()
        );
        conclude_reveal(decoded, opts.marker)
    }
}
