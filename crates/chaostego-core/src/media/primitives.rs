/// wrap the low level data types that carries information
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum MediaPrimitive {
    ImageColorChannel(u8),
    AudioFrameByte(u8),
    VideoPlaneSample(u8),
}

/// mutable primitive for storing stegano data
#[derive(Debug, Eq, PartialEq)]
pub enum MediaPrimitiveMut<'a> {
    ImageColorChannel(&'a mut u8),
    AudioFrameByte(&'a mut u8),
    VideoPlaneSample(&'a mut u8),
}

pub trait HideBit {
    fn hide_bit(self, bit: bool);
}

pub trait UnveilBit {
    fn unveil_bit(&self) -> bool;
}

impl HideBit for MediaPrimitiveMut<'_> {
    #[inline]
    fn hide_bit(self, bit: bool) {
        let v = match self {
            MediaPrimitiveMut::ImageColorChannel(v)
            | MediaPrimitiveMut::AudioFrameByte(v)
            | MediaPrimitiveMut::VideoPlaneSample(v) => v,
        };
        *v = (*v & 0xFE) | u8::from(bit);
    }
}

impl UnveilBit for MediaPrimitive {
    #[inline]
    fn unveil_bit(&self) -> bool {
        match self {
            MediaPrimitive::ImageColorChannel(v)
            | MediaPrimitive::AudioFrameByte(v)
            | MediaPrimitive::VideoPlaneSample(v) => v & 1 == 1,
        }
    }
}

/// Writes `bits` into the carrier primitives one by one, returns how many were written.
///
/// Stops at whichever runs out first, the carrier or the bits.
pub fn hide_bits<'a, C, B>(carrier: C, bits: B) -> usize
where
    C: IntoIterator<Item = MediaPrimitiveMut<'a>>,
    B: IntoIterator<Item = bool>,
{
    let mut written = 0;
    for (primitive, bit) in carrier.into_iter().zip(bits) {
        primitive.hide_bit(bit);
        written += 1;
    }
    written
}

/// Reads the hidden bit of every carrier primitive.
pub fn unveil_bits<C>(carrier: C) -> impl Iterator<Item = bool>
where
    C: IntoIterator<Item = MediaPrimitive>,
{
    carrier.into_iter().map(|primitive| primitive.unveil_bit())
}
