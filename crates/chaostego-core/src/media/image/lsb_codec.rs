use std::io::Cursor;

use bitstream_io::{BitRead, BitReader, BitWrite, BitWriter, LittleEndian};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use image::RgbaImage;
use log::{debug, info};

use super::iterators::color_channel_indices;
use super::ImageHider;
use crate::media::{
    check_capacity, CodecOptions, EmbedReport, HideBit, MediaPrimitive, MediaPrimitiveMut,
    UnveilBit,
};
use crate::result::Result;

/// text only (`1 << 0`) with a length header (`1 << 3`)
pub const TEXT_WITH_LENGTH_HEADER: u8 = 0b0000_1001;
const TERMINATOR: u8 = 0xff;
/// version byte + u32 length + terminator
const FRAMING_BYTES: usize = 6;

/// LSB image codec, one bit per color channel, least significant bit of a byte first.
///
/// Payload layout: `[0x09][len: u32 big endian][utf-8 bytes][0xff]`
#[derive(Debug, Default, Clone, Copy)]
pub struct LsbImageHider;

impl LsbImageHider {
    fn payload(message: &str) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(message.len() + FRAMING_BYTES);
        buffer.write_u8(TEXT_WITH_LENGTH_HEADER)?;
        buffer.write_u32::<BigEndian>(message.len() as u32)?;
        buffer.extend_from_slice(message.as_bytes());
        buffer.write_u8(TERMINATOR)?;

        Ok(buffer)
    }

    /// number of channels that can carry a bit
    pub fn capacity(image: &RgbaImage, opts: &CodecOptions) -> usize {
        color_channel_indices(image.width(), image.height(), &opts.image).count()
    }
}

/// Reads `n` bytes worth of bits, `None` if the bits run out before.
fn read_bytes(bits: &mut impl Iterator<Item = bool>, n: usize) -> Result<Option<Vec<u8>>> {
    let mut writer = BitWriter::endian(Vec::with_capacity(n), LittleEndian);
    for _ in 0..n * 8 {
        match bits.next() {
            Some(bit) => writer.write_bit(bit)?,
            None => return Ok(None),
        }
    }

    Ok(Some(writer.into_writer()))
}

impl ImageHider for LsbImageHider {
    fn hide(
        &self,
        image: &mut RgbaImage,
        message: &str,
        opts: &CodecOptions,
    ) -> Result<EmbedReport> {
        let payload = Self::payload(message)?;
        let needed_bits = payload.len() * 8;
        let (width, height) = image.dimensions();
        let available = Self::capacity(image, opts);
        check_capacity(needed_bits, available, opts.capacity)?;

        let mut bits = BitReader::endian(Cursor::new(&payload), LittleEndian);
        let raw: &mut [u8] = image;
        let mut written_bits = 0;
        for idx in color_channel_indices(width, height, &opts.image) {
            let Ok(bit) = bits.read_bit() else {
                break;
            };
            MediaPrimitiveMut::ImageColorChannel(&mut raw[idx]).hide_bit(bit);
            written_bits += 1;
        }

        let report = EmbedReport::new(needed_bits, written_bits);
        report.warn_if_truncated("image");
        info!("hid {written_bits} bits in a {width}x{height} image");

        Ok(report)
    }

    fn reveal(&self, image: &RgbaImage, opts: &CodecOptions) -> Result<Option<String>> {
        let raw = image.as_raw();
        let mut bits = color_channel_indices(image.width(), image.height(), &opts.image)
            .map(|idx| MediaPrimitive::ImageColorChannel(raw[idx]).unveil_bit());

        let Some(header) = read_bytes(&mut bits, 5)? else {
            return Ok(None);
        };
        let mut header = Cursor::new(header);
        let version = header.read_u8()?;
        if version != TEXT_WITH_LENGTH_HEADER {
            debug!("no message in image, unknown version byte {version:#04x}");
            return Ok(None);
        }

        let len = header.read_u32::<BigEndian>()? as usize;
        let max_len = Self::capacity(image, opts) / 8;
        if len > max_len {
            debug!("no message in image, length {len} exceeds the capacity of {max_len} bytes");
            return Ok(None);
        }

        match read_bytes(&mut bits, len)? {
            Some(content) => Ok(Some(String::from_utf8_lossy(&content).into_owned())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChaostegoError;
    use crate::media::CapacityPolicy;
    use crate::test_utils::prepare_5x5_image;

    fn carrier(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let i = (x * 5 + y * 13) as u8;
            image::Rgba([i, i ^ 0x55, i.wrapping_mul(7), 255])
        })
    }

    #[test]
    fn should_frame_the_payload() {
        let payload = LsbImageHider::payload("He").unwrap();
        assert_eq!(payload, vec![0x09, 0, 0, 0, 2, b'H', b'e', 0xff]);
    }

    #[test]
    fn should_hide_and_reveal() {
        let mut image = carrier(32, 32);
        let opts = CodecOptions::default();
        LsbImageHider.hide(&mut image, "Hello World!", &opts).unwrap();
        assert_eq!(
            LsbImageHider.reveal(&image, &opts).unwrap(),
            Some("Hello World!".to_string())
        );
    }

    #[test]
    fn should_hide_the_first_bit_in_the_red_channel_of_the_first_pixel() {
        let mut image = prepare_5x5_image();
        LsbImageHider
            .hide(&mut image, "", &CodecOptions::default())
            .unwrap();
        // 0x09 least significant bit first: 1, 0, 0, 1, ...
        let first = image.get_pixel(0, 0);
        assert_eq!(first.0[0] & 1, 1);
        assert_eq!(first.0[1] & 1, 0);
        assert_eq!(first.0[2] & 1, 0);
        assert_eq!(first.0[3], 3, "alpha is left alone");
        assert_eq!(image.get_pixel(0, 1).0[0] & 1, 1);
    }

    #[test]
    fn should_not_find_anything_in_a_plain_image() {
        let image = RgbaImage::from_pixel(16, 16, image::Rgba([0, 0, 0, 255]));
        assert_eq!(
            LsbImageHider.reveal(&image, &CodecOptions::default()).unwrap(),
            None
        );
    }

    #[test]
    fn should_reject_too_small_images() {
        let mut image = carrier(4, 4);
        // 3x3 usable pixels, 27 bits
        match LsbImageHider.hide(&mut image, "x", &CodecOptions::default()) {
            Err(ChaostegoError::CapacityExceeded { needed, available }) => {
                assert_eq!(needed, 56);
                assert_eq!(available, 27);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn truncated_messages_should_not_be_revealed() {
        let mut image = carrier(5, 5);
        let opts = CodecOptions::default().with_capacity_policy(CapacityPolicy::Truncate);
        let report = LsbImageHider.hide(&mut image, "too long", &opts).unwrap();
        assert!(report.is_truncated());
        assert_eq!(LsbImageHider.reveal(&image, &opts).unwrap(), None);
    }
}
