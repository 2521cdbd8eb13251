use image::RgbImage;
use log::{debug, info};

use super::{FrameSink, FrameSource};
use crate::bitstream::{self, BitstreamDecoder};
use crate::error::ChaostegoError;
use crate::media::{
    check_capacity, conclude_reveal, hide_bits, unveil_bits, CapacityPolicy, CodecOptions,
    EmbedReport, MediaPrimitive, MediaPrimitiveMut,
};
use crate::result::Result;

/// Factory for the carrier primitives of one color plane of a frame
pub struct LsbCodec;

impl LsbCodec {
    /// plane samples in row major order
    pub fn decoder(frame: &RgbImage, channel: usize) -> impl Iterator<Item = bool> + '_ {
        unveil_bits(
            frame
                .pixels()
                .map(move |p| MediaPrimitive::VideoPlaneSample(p.0[channel])),
        )
    }

    pub fn encoder(
        frame: &mut RgbImage,
        channel: usize,
    ) -> impl Iterator<Item = MediaPrimitiveMut<'_>> {
        frame
            .pixels_mut()
            .map(move |p| MediaPrimitiveMut::VideoPlaneSample(&mut p.0[channel]))
    }
}

/// Hides text messages in one color plane across consecutive video frames.
///
/// Only one frame is held in memory at a time.
pub struct VideoSteganographer;

impl VideoSteganographer {
    /// Streams every frame of `source` into `sink`, the message goes into the
    /// leading frames, all frames after it are passed through untouched.
    ///
    /// The sink is not finished here, that is up to the caller.
    pub fn embed(
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
        message: &str,
        opts: &CodecOptions,
    ) -> Result<EmbedReport> {
        let spec = source.spec();
        let channel = opts.video_plane.channel();
        let bits = bitstream::encode(message);
        if let Some(frames) = source.frame_count() {
            check_capacity(bits.len(), frames * spec.plane_capacity(), opts.capacity)?;
        }

        let mut remaining = bits.iter();
        let mut written = 0;
        let mut available = 0;
        let mut frames = 0;
        while let Some(mut frame) = source.next_frame()? {
            available += frame.width() as usize * frame.height() as usize;
            if written < bits.len() {
                written += hide_bits(LsbCodec::encoder(&mut frame, channel), &mut remaining);
            }
            sink.write_frame(&frame)?;
            frames += 1;
        }

        if written < bits.len() && opts.capacity == CapacityPolicy::Reject {
            return Err(ChaostegoError::CapacityExceeded {
                needed: bits.len(),
                available,
            });
        }

        let report = EmbedReport::new(bits.len(), written);
        report.warn_if_truncated("video");
        info!(
            "hid {} of {} bits in {frames} video frames",
            report.written_bits, report.needed_bits
        );

        Ok(report)
    }

    /// Reads plane samples until the end marker, which may span two frames.
    pub fn reveal(source: &mut dyn FrameSource, opts: &CodecOptions) -> Result<String> {
        let channel = opts.video_plane.channel();
        let mut decoder = BitstreamDecoder::new();
        let mut frames = 0;

        'frames: while let Some(frame) = source.next_frame()? {
            frames += 1;
            for bit in LsbCodec::decoder(&frame, channel) {
                if decoder.push(bit) {
                    break 'frames;
                }
            }
        }
        debug!(
            "read {} bits from {frames} video frames",
            decoder.consumed_bits()
        );

        conclude_reveal(decoder.finish(), opts.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::video::{FrameSequence, FrameSequenceSink, VideoSpec};
    use crate::media::{ColorPlane, MarkerPolicy};

    fn video(width: u32, height: u32, frames: usize) -> FrameSequence {
        let spec = VideoSpec::new(width, height, 24.0);
        let frames = (0..frames)
            .map(|n| {
                RgbImage::from_fn(width, height, |x, y| {
                    let i = (x + 3 * y + 11 * n as u32) as u8;
                    image::Rgb([i, i.wrapping_mul(3), i.wrapping_add(7)])
                })
            })
            .collect();
        FrameSequence::new(spec, frames).unwrap()
    }

    fn embed(
        original: &FrameSequence,
        message: &str,
        opts: &CodecOptions,
    ) -> Result<(EmbedReport, FrameSequence)> {
        let mut source = original.clone();
        let mut sink = FrameSequenceSink::new(original.spec());
        let report = VideoSteganographer::embed(&mut source, &mut sink, message, opts)?;
        Ok((report, sink.into_sequence()?))
    }

    #[test]
    fn should_hide_and_reveal_within_one_frame() {
        let original = video(8, 8, 3);
        let (_, mut secret) = embed(&original, "hi", &CodecOptions::default()).unwrap();
        assert_eq!(secret.len(), 3);
        assert_eq!(
            VideoSteganographer::reveal(&mut secret, &CodecOptions::default()).unwrap(),
            "hi"
        );
    }

    #[test]
    fn should_continue_into_the_next_frame() {
        // 4x4 frames carry 16 bits each, "HI" + marker needs 32
        let original = video(4, 4, 3);
        let (report, secret) = embed(&original, "HI", &CodecOptions::default()).unwrap();
        assert_eq!(report.written_bits, 32);

        let frames: Vec<&RgbImage> = secret.frames().collect();
        let originals: Vec<&RgbImage> = original.frames().collect();
        assert_ne!(frames[1], originals[1], "second frame should carry bits");
        assert_eq!(frames[2], originals[2], "third frame should be untouched");

        let mut secret = secret;
        assert_eq!(
            VideoSteganographer::reveal(&mut secret, &CodecOptions::default()).unwrap(),
            "HI"
        );
    }

    #[test]
    fn should_find_a_marker_straddling_two_frames() {
        // 4x4 frames carry 16 bits, the marker occupies bits 8..24
        let original = video(4, 4, 2);
        let (_, mut secret) = embed(&original, "Z", &CodecOptions::default()).unwrap();
        let opts = CodecOptions::default().with_marker_policy(MarkerPolicy::Strict);
        assert_eq!(VideoSteganographer::reveal(&mut secret, &opts).unwrap(), "Z");
    }

    #[test]
    fn should_only_modify_the_designated_plane() {
        let original = video(8, 8, 1);
        let (_, secret) = embed(&original, "plane", &CodecOptions::default()).unwrap();
        let before = original.frames().next().unwrap();
        let after = secret.frames().next().unwrap();
        for (b, a) in before.pixels().zip(after.pixels()) {
            assert_eq!(b.0[0], a.0[0]);
            assert_eq!(b.0[1], a.0[1]);
            assert_eq!(b.0[2] & 0xFE, a.0[2] & 0xFE);
        }
    }

    #[test]
    fn should_honour_another_plane() {
        let original = video(8, 8, 1);
        let opts = CodecOptions::default().with_video_plane(ColorPlane::Red);
        let (_, mut secret) = embed(&original, "red", &opts).unwrap();
        assert_eq!(VideoSteganographer::reveal(&mut secret, &opts).unwrap(), "red");
    }

    #[test]
    fn should_be_deterministic() {
        let original = video(6, 6, 4);
        let (_, a) = embed(&original, "same same", &CodecOptions::default()).unwrap();
        let (_, b) = embed(&original, "same same", &CodecOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn should_reject_before_writing_when_frames_are_known() {
        let original = video(4, 4, 1);
        let mut source = original.clone();
        let mut sink = FrameSequenceSink::new(original.spec());
        let result =
            VideoSteganographer::embed(&mut source, &mut sink, "HI", &CodecOptions::default());
        assert!(matches!(
            result,
            Err(ChaostegoError::CapacityExceeded {
                needed: 32,
                available: 16
            })
        ));
        assert!(sink.into_sequence().unwrap().is_empty());
    }

    #[test]
    fn should_truncate_when_asked_to() {
        let original = video(4, 4, 1);
        let opts = CodecOptions::default().with_capacity_policy(CapacityPolicy::Truncate);
        let (report, secret) = embed(&original, "HI", &opts).unwrap();
        assert!(report.is_truncated());
        assert_eq!(secret.len(), 1);
    }

    #[test]
    fn reveal_on_a_plain_video_should_not_fail() {
        let mut plain = video(4, 4, 2);
        VideoSteganographer::reveal(&mut plain, &CodecOptions::default())
            .expect("lenient reveal must not fail");
    }
}
