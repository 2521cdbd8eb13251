//! Uncompressed AVI: one video stream of 24 bit BGR DIB frames.
//!
//! This is the one container the crate reads and writes on its own. Frames are
//! stored losslessly, so hidden bits survive a write and read cycle.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use image::RgbImage;
use log::debug;

use super::{FrameSink, FrameSource, VideoCodec, VideoSpec};
use crate::error::ChaostegoError;
use crate::media::CarrierKind;
use crate::result::Result;

const AVIF_HASINDEX: u32 = 0x10;
const AVIIF_KEYFRAME: u32 = 0x10;
const BI_RGB: u32 = 0;
const RATE_SCALE: u32 = 1000;
const MAIN_HEADER_LEN: u32 = 56;
const STREAM_HEADER_LEN: u32 = 56;
const BITMAP_HEADER_LEN: u32 = 40;

/// Reads and writes uncompressed AVI files, whatever the extension of the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct AviCodec;

impl VideoCodec for AviCodec {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        let file = File::open(path).map_err(open_failure)?;
        Ok(Box::new(AviReader::new(BufReader::new(file))?))
    }

    fn create(&self, path: &Path, spec: VideoSpec) -> Result<Box<dyn FrameSink>> {
        let file = File::create(path).map_err(|source| ChaostegoError::WriteError { source })?;
        Ok(Box::new(AviWriter::new(BufWriter::new(file), spec)?))
    }
}

fn open_failure(reason: impl ToString) -> ChaostegoError {
    ChaostegoError::CarrierOpenFailure {
        kind: CarrierKind::Video,
        reason: reason.to_string(),
    }
}

fn encoding_error(reason: impl ToString) -> ChaostegoError {
    ChaostegoError::VideoEncodingError(reason.to_string())
}

/// Bytes per DIB row, rows are padded to 4 bytes.
fn row_stride(width: u32) -> usize {
    (width as usize * 3 + 3) & !3
}

fn to_u32(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| encoding_error("video exceeds the 4 GiB AVI size limit"))
}

/// Streams frames into an AVI file, the headers are completed by [`AviWriter::finalize`].
pub struct AviWriter<W: Write + Seek> {
    inner: W,
    spec: VideoSpec,
    riff_size_at: u64,
    total_frames_at: u64,
    stream_length_at: u64,
    movi_size_at: u64,
    /// chunk offsets relative to the `movi` list type
    index: Vec<u32>,
    frame_bytes: u32,
}

impl<W: Write + Seek> AviWriter<W> {
    pub fn new(mut inner: W, spec: VideoSpec) -> Result<Self> {
        let frame_bytes = to_u32((row_stride(spec.width) * spec.height as usize) as u64)?;
        let width = i32::try_from(spec.width).map_err(encoding_error)?;
        let height = i32::try_from(spec.height).map_err(encoding_error)?;
        let rate = (spec.frame_rate * RATE_SCALE as f64).round() as u32;
        let strl_len = 4 + 8 + STREAM_HEADER_LEN + 8 + BITMAP_HEADER_LEN;
        let hdrl_len = 4 + 8 + MAIN_HEADER_LEN + 8 + strl_len;

        inner.write_all(b"RIFF")?;
        let riff_size_at = inner.stream_position()?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_all(b"AVI ")?;

        inner.write_all(b"LIST")?;
        inner.write_u32::<LittleEndian>(hdrl_len)?;
        inner.write_all(b"hdrl")?;

        inner.write_all(b"avih")?;
        inner.write_u32::<LittleEndian>(MAIN_HEADER_LEN)?;
        inner.write_u32::<LittleEndian>((1_000_000.0 / spec.frame_rate).round() as u32)?;
        inner.write_u32::<LittleEndian>((frame_bytes as f64 * spec.frame_rate) as u32)?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_u32::<LittleEndian>(AVIF_HASINDEX)?;
        let total_frames_at = inner.stream_position()?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_u32::<LittleEndian>(1)?;
        inner.write_u32::<LittleEndian>(frame_bytes)?;
        inner.write_u32::<LittleEndian>(spec.width)?;
        inner.write_u32::<LittleEndian>(spec.height)?;
        inner.write_all(&[0; 16])?;

        inner.write_all(b"LIST")?;
        inner.write_u32::<LittleEndian>(strl_len)?;
        inner.write_all(b"strl")?;

        inner.write_all(b"strh")?;
        inner.write_u32::<LittleEndian>(STREAM_HEADER_LEN)?;
        inner.write_all(b"vids")?;
        inner.write_all(b"DIB ")?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_u16::<LittleEndian>(0)?;
        inner.write_u16::<LittleEndian>(0)?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_u32::<LittleEndian>(RATE_SCALE)?;
        inner.write_u32::<LittleEndian>(rate)?;
        inner.write_u32::<LittleEndian>(0)?;
        let stream_length_at = inner.stream_position()?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_u32::<LittleEndian>(frame_bytes)?;
        inner.write_u32::<LittleEndian>(u32::MAX)?;
        inner.write_u32::<LittleEndian>(frame_bytes)?;
        inner.write_i16::<LittleEndian>(0)?;
        inner.write_i16::<LittleEndian>(0)?;
        inner.write_i16::<LittleEndian>(width.min(i16::MAX as i32) as i16)?;
        inner.write_i16::<LittleEndian>(height.min(i16::MAX as i32) as i16)?;

        inner.write_all(b"strf")?;
        inner.write_u32::<LittleEndian>(BITMAP_HEADER_LEN)?;
        inner.write_u32::<LittleEndian>(BITMAP_HEADER_LEN)?;
        inner.write_i32::<LittleEndian>(width)?;
        inner.write_i32::<LittleEndian>(height)?;
        inner.write_u16::<LittleEndian>(1)?;
        inner.write_u16::<LittleEndian>(24)?;
        inner.write_u32::<LittleEndian>(BI_RGB)?;
        inner.write_u32::<LittleEndian>(frame_bytes)?;
        inner.write_all(&[0; 16])?;

        inner.write_all(b"LIST")?;
        let movi_size_at = inner.stream_position()?;
        inner.write_u32::<LittleEndian>(0)?;
        inner.write_all(b"movi")?;

        Ok(Self {
            inner,
            spec,
            riff_size_at,
            total_frames_at,
            stream_length_at,
            movi_size_at,
            index: Vec::new(),
            frame_bytes,
        })
    }

    /// Writes the index and patches every size and frame count in the headers.
    pub fn finalize(&mut self) -> Result<()> {
        let movi_end = self.inner.stream_position()?;
        let frames = to_u32(self.index.len() as u64)?;

        self.inner.write_all(b"idx1")?;
        self.inner.write_u32::<LittleEndian>(to_u32(self.index.len() as u64 * 16)?)?;
        for offset in &self.index {
            self.inner.write_all(b"00db")?;
            self.inner.write_u32::<LittleEndian>(AVIIF_KEYFRAME)?;
            self.inner.write_u32::<LittleEndian>(*offset)?;
            self.inner.write_u32::<LittleEndian>(self.frame_bytes)?;
        }
        let end = self.inner.stream_position()?;

        self.patch(self.riff_size_at, to_u32(end - self.riff_size_at - 4)?)?;
        self.patch(self.movi_size_at, to_u32(movi_end - self.movi_size_at - 4)?)?;
        self.patch(self.total_frames_at, frames)?;
        self.patch(self.stream_length_at, frames)?;
        self.inner.seek(SeekFrom::Start(end))?;
        self.inner.flush()?;
        debug!("wrote {frames} AVI frames");

        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn patch(&mut self, at: u64, value: u32) -> Result<()> {
        self.inner.seek(SeekFrom::Start(at))?;
        self.inner.write_u32::<LittleEndian>(value)?;
        Ok(())
    }
}

impl<W: Write + Seek> FrameSink for AviWriter<W> {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != (self.spec.width, self.spec.height) {
            return Err(encoding_error(format!(
                "frame is {}x{}, the output is {}x{}",
                frame.width(),
                frame.height(),
                self.spec.width,
                self.spec.height
            )));
        }

        let chunk_at = self.inner.stream_position()?;
        self.index.push(to_u32(chunk_at - self.movi_size_at - 4)?);
        self.inner.write_all(b"00db")?;
        self.inner.write_u32::<LittleEndian>(self.frame_bytes)?;

        let mut row = vec![0u8; row_stride(frame.width())];
        for y in (0..frame.height()).rev() {
            for x in 0..frame.width() {
                let [r, g, b] = frame.get_pixel(x, y).0;
                let at = x as usize * 3;
                row[at..at + 3].copy_from_slice(&[b, g, r]);
            }
            self.inner.write_all(&row)?;
        }

        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.finalize()
    }
}

/// Reads the frames of the first video stream of an uncompressed AVI file.
pub struct AviReader<R: Read + Seek> {
    inner: R,
    spec: VideoSpec,
    frame_count: Option<usize>,
    top_down: bool,
    stream_tag: [u8; 2],
    movi_end: u64,
}

/// What the header lists tell about the video stream.
#[derive(Default)]
struct StreamInfo {
    micro_sec_per_frame: u32,
    total_frames: u32,
    streams_seen: u8,
    video_stream: Option<u8>,
    scale: u32,
    rate: u32,
    length: u32,
    bitmap: Option<(i32, i32)>,
}

impl<R: Read + Seek> AviReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let mut tag = [0u8; 4];
        inner.read_exact(&mut tag).map_err(open_failure)?;
        inner.read_u32::<LittleEndian>().map_err(open_failure)?;
        let mut form = [0u8; 4];
        inner.read_exact(&mut form).map_err(open_failure)?;
        if &tag != b"RIFF" || &form != b"AVI " {
            return Err(open_failure("not an AVI file"));
        }

        let mut info = StreamInfo::default();
        let movi_end = loop {
            let (id, size) = read_chunk_header(&mut inner).map_err(open_failure)?;
            match &id {
                b"LIST" => {
                    let mut list = [0u8; 4];
                    inner.read_exact(&mut list).map_err(open_failure)?;
                    match &list {
                        b"movi" => break inner.stream_position()? + (size as u64).saturating_sub(4),
                        b"hdrl" | b"strl" => {}
                        _ => skip(&mut inner, padded(size).saturating_sub(4))?,
                    }
                }
                b"avih" if size >= 20 => {
                    info.micro_sec_per_frame = inner.read_u32::<LittleEndian>().map_err(open_failure)?;
                    skip(&mut inner, 12)?;
                    info.total_frames = inner.read_u32::<LittleEndian>().map_err(open_failure)?;
                    skip(&mut inner, padded(size) - 20)?;
                }
                b"strh" => read_stream_header(&mut inner, size, &mut info)?,
                b"strf" if info.is_video_pending() => read_bitmap_header(&mut inner, size, &mut info)?,
                _ => skip(&mut inner, padded(size))?,
            }
        };

        let (stream, (width, height)) = match (info.video_stream, info.bitmap) {
            (Some(stream), Some(bitmap)) => (stream, bitmap),
            _ => return Err(open_failure("no video stream in AVI file")),
        };
        let frame_rate = if info.scale > 0 && info.rate > 0 {
            info.rate as f64 / info.scale as f64
        } else if info.micro_sec_per_frame > 0 {
            1_000_000.0 / info.micro_sec_per_frame as f64
        } else {
            0.0
        };
        let spec = VideoSpec::new(width.unsigned_abs(), height.unsigned_abs(), frame_rate);
        let frames = if info.length > 0 { info.length } else { info.total_frames };
        let tag = format!("{stream:02}");
        let mut stream_tag = [0u8; 2];
        stream_tag.copy_from_slice(&tag.as_bytes()[..2]);
        debug!(
            "AVI video {}x{} at {} fps, {frames} frames",
            spec.width, spec.height, spec.frame_rate
        );

        Ok(Self {
            inner,
            spec,
            frame_count: (frames > 0).then_some(frames as usize),
            top_down: height < 0,
            stream_tag,
            movi_end,
        })
    }

    fn decode_frame(&mut self, size: u32) -> Result<RgbImage> {
        let (width, height) = (self.spec.width, self.spec.height);
        let stride = row_stride(width);
        if (size as usize) < stride * height as usize {
            return Err(open_failure(format!(
                "frame chunk of {size} bytes is too short for {width}x{height}"
            )));
        }

        let mut data = vec![0u8; size as usize];
        self.inner.read_exact(&mut data).map_err(open_failure)?;
        skip(&mut self.inner, padded(size) - size as u64)?;

        let top_down = self.top_down;
        Ok(RgbImage::from_fn(width, height, |x, y| {
            let row = if top_down { y } else { height - 1 - y };
            let at = row as usize * stride + x as usize * 3;
            image::Rgb([data[at + 2], data[at + 1], data[at]])
        }))
    }
}

impl StreamInfo {
    fn is_video_pending(&self) -> bool {
        self.bitmap.is_none() && self.video_stream == Some(self.streams_seen.wrapping_sub(1))
    }
}

fn read_chunk_header(inner: &mut impl Read) -> std::io::Result<([u8; 4], u32)> {
    let mut id = [0u8; 4];
    inner.read_exact(&mut id)?;
    Ok((id, inner.read_u32::<LittleEndian>()?))
}

/// Chunk data is padded to an even length.
fn padded(size: u32) -> u64 {
    size as u64 + (size & 1) as u64
}

fn skip(inner: &mut impl Seek, bytes: u64) -> Result<()> {
    let bytes = i64::try_from(bytes).map_err(open_failure)?;
    inner.seek(SeekFrom::Current(bytes)).map_err(open_failure)?;
    Ok(())
}

fn read_stream_header(inner: &mut (impl Read + Seek), size: u32, info: &mut StreamInfo) -> Result<()> {
    if size < 36 {
        return Err(open_failure("truncated AVI stream header"));
    }
    let mut kind = [0u8; 4];
    inner.read_exact(&mut kind).map_err(open_failure)?;
    let stream = info.streams_seen;
    info.streams_seen = info.streams_seen.saturating_add(1);
    if &kind != b"vids" || info.video_stream.is_some() {
        return skip(inner, padded(size) - 4);
    }

    info.video_stream = Some(stream);
    skip(inner, 16)?;
    info.scale = inner.read_u32::<LittleEndian>().map_err(open_failure)?;
    info.rate = inner.read_u32::<LittleEndian>().map_err(open_failure)?;
    skip(inner, 4)?;
    info.length = inner.read_u32::<LittleEndian>().map_err(open_failure)?;
    skip(inner, padded(size) - 36)
}

fn read_bitmap_header(inner: &mut (impl Read + Seek), size: u32, info: &mut StreamInfo) -> Result<()> {
    if size < BITMAP_HEADER_LEN {
        return Err(open_failure("truncated AVI bitmap header"));
    }
    skip(inner, 4)?;
    let width = inner.read_i32::<LittleEndian>().map_err(open_failure)?;
    let height = inner.read_i32::<LittleEndian>().map_err(open_failure)?;
    skip(inner, 2)?;
    let bit_count = inner.read_u16::<LittleEndian>().map_err(open_failure)?;
    let compression = inner.read_u32::<LittleEndian>().map_err(open_failure)?;
    if compression != BI_RGB || bit_count != 24 {
        return Err(open_failure(
            "only uncompressed 24 bit AVI video is supported",
        ));
    }
    if width <= 0 || height == 0 {
        return Err(open_failure(format!("invalid AVI frame size {width}x{height}")));
    }

    info.bitmap = Some((width, height));
    skip(inner, padded(size) - 20)
}

impl<R: Read + Seek> FrameSource for AviReader<R> {
    fn spec(&self) -> VideoSpec {
        self.spec
    }

    fn frame_count(&self) -> Option<usize> {
        self.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        while self.inner.stream_position()? + 8 <= self.movi_end {
            let (id, size) = read_chunk_header(&mut self.inner).map_err(open_failure)?;
            if &id == b"LIST" {
                // `rec ` lists group chunks, their content is read in place
                skip(&mut self.inner, 4)?;
                continue;
            }
            let is_frame = id[..2] == self.stream_tag && (&id[2..] == b"db" || &id[2..] == b"dc");
            if is_frame && size > 0 {
                return self.decode_frame(size).map(Some);
            }
            skip(&mut self.inner, padded(size))?;
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn frames(width: u32, height: u32, count: usize) -> Vec<RgbImage> {
        (0..count)
            .map(|n| {
                RgbImage::from_fn(width, height, |x, y| {
                    let i = (x * 7 + y * 13 + n as u32 * 29) as u8;
                    image::Rgb([i, i.wrapping_add(85), i.wrapping_mul(3)])
                })
            })
            .collect()
    }

    fn write(spec: VideoSpec, frames: &[RgbImage]) -> Vec<u8> {
        let mut writer = AviWriter::new(Cursor::new(Vec::new()), spec).unwrap();
        for frame in frames {
            writer.write_frame(frame).unwrap();
        }
        writer.finalize().unwrap();
        writer.into_inner().into_inner()
    }

    fn read_all(bytes: Vec<u8>) -> (AviReader<Cursor<Vec<u8>>>, Vec<RgbImage>) {
        let mut reader = AviReader::new(Cursor::new(bytes)).unwrap();
        let mut read = Vec::new();
        while let Some(frame) = reader.next_frame().unwrap() {
            read.push(frame);
        }
        (reader, read)
    }

    #[test]
    fn should_read_back_the_written_frames() {
        // 5 pixels wide rows need padding
        let spec = VideoSpec::new(5, 3, 25.0);
        let original = frames(5, 3, 4);

        let (_, read) = read_all(write(spec, &original));

        assert_eq!(read, original);
    }

    #[test]
    fn should_keep_size_rate_and_frame_count() {
        let spec = VideoSpec::new(6, 2, 29.97);
        let bytes = write(spec, &frames(6, 2, 3));

        let reader = AviReader::new(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.spec().width, 6);
        assert_eq!(reader.spec().height, 2);
        assert!((reader.spec().frame_rate - 29.97).abs() < 1e-9);
        assert_eq!(reader.frame_count(), Some(3));
    }

    #[test]
    fn should_patch_riff_and_movi_sizes() {
        let bytes = write(VideoSpec::new(4, 4, 30.0), &frames(4, 4, 2));

        let riff_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        assert_eq!(riff_size as usize, bytes.len() - 8);
        assert_eq!(&bytes[bytes.len() - 2 * 16 - 8..][..4], b"idx1");
    }

    #[test]
    fn should_not_report_a_frame_count_for_an_empty_video() {
        let (reader, read) = read_all(write(VideoSpec::new(4, 4, 30.0), &[]));

        assert_eq!(reader.frame_count(), None);
        assert!(read.is_empty());
    }

    #[test]
    fn should_reject_frames_of_another_size() {
        let mut writer = AviWriter::new(Cursor::new(Vec::new()), VideoSpec::new(4, 4, 30.0)).unwrap();

        let result = writer.write_frame(&RgbImage::new(3, 4));

        assert!(matches!(result, Err(ChaostegoError::VideoEncodingError(_))));
    }

    #[test]
    fn should_refuse_non_avi_bytes() {
        let result = AviReader::new(Cursor::new(b"RIFF\x04\x00\x00\x00WAVE".to_vec()));

        assert!(matches!(
            result,
            Err(ChaostegoError::CarrierOpenFailure {
                kind: CarrierKind::Video,
                ..
            })
        ));
    }

    #[test]
    fn should_refuse_compressed_video() {
        let mut bytes = write(VideoSpec::new(4, 4, 30.0), &frames(4, 4, 1));
        let strf = bytes.windows(4).position(|w| w == b"strf").unwrap();
        // biCompression of the bitmap header
        bytes[strf + 8 + 16..strf + 8 + 20].copy_from_slice(b"MJPG");

        let result = AviReader::new(Cursor::new(bytes));

        assert!(matches!(result, Err(ChaostegoError::CarrierOpenFailure { .. })));
    }

    #[test]
    fn should_round_trip_through_a_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("clip.avi");
        let original = frames(4, 4, 2);
        let mut sink = AviCodec.create(&path, VideoSpec::new(4, 4, 24.0)).unwrap();
        for frame in &original {
            sink.write_frame(frame).unwrap();
        }
        sink.finish().unwrap();

        let mut source = AviCodec.open(&path).unwrap();

        assert_eq!(source.spec(), VideoSpec::new(4, 4, 24.0));
        assert_eq!(source.next_frame().unwrap().as_ref(), Some(&original[0]));
        assert_eq!(source.next_frame().unwrap().as_ref(), Some(&original[1]));
        assert!(source.next_frame().unwrap().is_none());
    }
}
