//! Text message to bit sequence codec, shared by the audio and video carriers.
//!
//! A message is stored as its UTF-8 bytes, bit by bit with the most significant
//! bit first, followed by the 16 bit [`END_MARKER`].

use log::debug;

use crate::BitIterator;

/// `1111111111111110`, terminates every embedded message.
pub const END_MARKER: u16 = 0b1111_1111_1111_1110;
pub const END_MARKER_BITS: usize = 16;

/// The bits of a message followed by the end marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

/// Turns a text message into its marked bit sequence.
pub fn encode(message: &str) -> BitSequence {
    let mut bytes = Vec::with_capacity(message.len() + 2);
    bytes.extend_from_slice(message.as_bytes());
    bytes.extend_from_slice(&END_MARKER.to_be_bytes());

    let bits: Vec<bool> = BitIterator::new(&bytes[..]).collect();
    debug!(
        "encoded {} message bytes into {} bits",
        message.len(),
        bits.len()
    );

    BitSequence { bits }
}

/// Consumes `bits` until the end marker shows up, `max_bits` caps the bits taken.
pub fn decode<I: IntoIterator<Item = bool>>(bits: I, max_bits: Option<usize>) -> Decoded {
    let mut decoder = BitstreamDecoder::new();
    let limit = max_bits.unwrap_or(usize::MAX);

    for bit in bits.into_iter().take(limit) {
        if decoder.push(bit) {
            break;
        }
    }

    decoder.finish()
}

/// Result of a decode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub message: String,
    pub consumed_bits: usize,
    pub marker_found: bool,
}

/// Incremental decoder, fed one carrier bit at a time.
///
/// The last 16 bits are held back in a shift register, a bit only becomes message
/// data once it got pushed out of the window. Hence the marker bits never end up
/// in the message.
#[derive(Debug, Default)]
pub struct BitstreamDecoder {
    window: u16,
    filled: usize,
    consumed: usize,
    marker_found: bool,
    byte: u8,
    byte_bits: u8,
    bytes: Vec<u8>,
}

impl BitstreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` as soon as the end marker was completed.
    pub fn push(&mut self, bit: bool) -> bool {
        if self.marker_found {
            return true;
        }
        self.consumed += 1;

        if self.filled == END_MARKER_BITS {
            let evicted = self.window & 0x8000 != 0;
            self.emit(evicted);
        } else {
            self.filled += 1;
        }
        self.window = (self.window << 1) | u16::from(bit);

        if self.filled == END_MARKER_BITS && self.window == END_MARKER {
            self.marker_found = true;
        }
        self.marker_found
    }

    pub fn is_complete(&self) -> bool {
        self.marker_found
    }

    pub fn consumed_bits(&self) -> usize {
        self.consumed
    }

    pub fn finish(mut self) -> Decoded {
        if !self.marker_found {
            // no marker, the held back bits belong to the message
            for i in (0..self.filled).rev() {
                self.emit((self.window >> i) & 1 == 1);
            }
        }
        // an incomplete trailing byte is dropped
        let message = decode_utf8_lossy(&self.bytes);

        Decoded {
            message,
            consumed_bits: self.consumed,
            marker_found: self.marker_found,
        }
    }

    fn emit(&mut self, bit: bool) {
        self.byte = (self.byte << 1) | u8::from(bit);
        self.byte_bits += 1;
        if self.byte_bits == 8 {
            self.bytes.push(self.byte);
            self.byte = 0;
            self.byte_bits = 0;
        }
    }
}

/// UTF-8 decoding that skips invalid sequences instead of failing.
fn decode_utf8_lossy(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                if let Ok(valid) = std::str::from_utf8(valid) {
                    text.push_str(valid);
                }
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverage_helper::test;

    fn bits_of(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn should_encode_msb_first_with_marker() {
        let bits = encode("H");
        let expected = bits_of("01001000" /* H */);
        assert_eq!(&bits.as_slice()[..8], &expected[..]);
        assert_eq!(&bits.as_slice()[8..], &bits_of("1111111111111110")[..]);
    }

    #[test]
    fn encoded_length_should_be_eight_bits_per_byte_plus_marker() {
        assert_eq!(encode("").len(), 16);
        assert_eq!(encode("HI").len(), 32);
        assert_eq!(encode("ü").len(), 2 * 8 + 16);
    }

    #[test]
    fn should_decode_an_encoded_message() {
        let bits = encode("Hello World!");
        let decoded = decode(bits.iter(), None);
        assert_eq!(decoded.message, "Hello World!");
        assert!(decoded.marker_found);
        assert_eq!(decoded.consumed_bits, bits.len());
    }

    #[test]
    fn should_stop_right_after_the_marker() {
        let mut bits: Vec<bool> = encode("ab").iter().collect();
        bits.extend(bits_of("1010101011111111"));
        let decoded = decode(bits.iter().copied(), None);
        assert_eq!(decoded.message, "ab");
        assert_eq!(decoded.consumed_bits, 32);
    }

    #[test]
    fn should_return_everything_when_marker_is_missing() {
        // "A" followed by 3 stray bits that do not form a byte
        let bits = bits_of("01000001101");
        let decoded = decode(bits, None);
        assert!(!decoded.marker_found);
        assert_eq!(decoded.message, "A");
        assert_eq!(decoded.consumed_bits, 11);
    }

    #[test]
    fn should_respect_max_bits() {
        let bits = encode("Hello");
        let decoded = decode(bits.iter(), Some(16));
        assert!(!decoded.marker_found);
        assert_eq!(decoded.message, "He");
        assert_eq!(decoded.consumed_bits, 16);
    }

    #[test]
    fn should_drop_invalid_utf8() {
        let mut bits = bits_of("11111111"); // lone 0xff is no utf-8
        bits.extend(bits_of("01001111")); // O
        bits.extend(bits_of("01001011")); // K
        bits.extend(bits_of("1111111111111110"));
        assert_eq!(decode(bits, None).message, "OK");
    }

    #[test]
    fn trailing_one_bits_should_not_shift_the_marker() {
        // 0x7f ends on seven 1 bits that run straight into the marker
        let message = "ok\u{7f}";
        let decoded = decode(encode(message).iter(), None);
        assert!(decoded.marker_found);
        assert_eq!(decoded.message, message);
    }

    #[test]
    fn raw_marker_bytes_inside_the_data_cut_it_short() {
        let mut bits = bits_of("01100001"); // a
        bits.extend(bits_of("1111111111111110"));
        bits.extend(bits_of("01100010")); // b
        bits.extend(bits_of("1111111111111110"));
        let decoded = decode(bits, None);
        assert_eq!(decoded.message, "a");
        assert_eq!(decoded.consumed_bits, 24);
    }

    #[test]
    fn empty_message_should_round_trip() {
        let decoded = decode(encode("").iter(), None);
        assert_eq!(decoded.message, "");
        assert!(decoded.marker_found);
    }
}
