use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, error};

use crate::error::ChaostegoError;
use crate::media::CarrierKind;
use crate::result::Result;

/// WAV audio as raw little endian frame bytes, like they are laid out in the file.
///
/// The `WavSpec` (channels, sample rate, bits per sample and sample format) is
/// carried along untouched and used verbatim when writing.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    spec: WavSpec,
    frames: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleLayout {
    Unsigned8,
    Signed16,
    Signed24,
    Signed32,
    Float32,
}

impl SampleLayout {
    fn of(spec: &WavSpec) -> Result<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8) => Ok(Self::Unsigned8),
            (SampleFormat::Int, 16) => Ok(Self::Signed16),
            (SampleFormat::Int, 24) => Ok(Self::Signed24),
            (SampleFormat::Int, 32) => Ok(Self::Signed32),
            (SampleFormat::Float, 32) => Ok(Self::Float32),
            (format, bits) => Err(ChaostegoError::UnsupportedAudioFormat {
                bits_per_sample: bits,
                sample_format: match format {
                    SampleFormat::Int => "int",
                    SampleFormat::Float => "float",
                },
            }),
        }
    }
}

fn open_failure(reason: impl ToString) -> ChaostegoError {
    ChaostegoError::CarrierOpenFailure {
        kind: CarrierKind::Audio,
        reason: reason.to_string(),
    }
}

fn int_samples<R: Read>(reader: WavReader<R>) -> impl Iterator<Item = Result<i32>> {
    reader
        .into_samples::<i32>()
        .map(|sample| sample.map_err(open_failure))
}

impl PcmAudio {
    pub fn new(spec: WavSpec, frames: Vec<u8>) -> Self {
        Self { spec, frames }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let reader = WavReader::open(path).map_err(|e| {
            error!("Error opening audio {path:?}: {e}");
            open_failure(e)
        })?;
        Self::from_wav(reader)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = WavReader::new(BufReader::new(reader)).map_err(open_failure)?;
        Self::from_wav(reader)
    }

    fn from_wav<R: Read>(reader: WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let layout = SampleLayout::of(&spec)?;
        let mut frames = Vec::with_capacity(reader.len() as usize * (spec.bits_per_sample as usize / 8));

        match layout {
            SampleLayout::Float32 => {
                for sample in reader.into_samples::<f32>() {
                    frames.write_f32::<LittleEndian>(sample.map_err(open_failure)?)?;
                }
            }
            // 8 bit WAV is unsigned with an offset of 128
            SampleLayout::Unsigned8 => {
                for sample in int_samples(reader) {
                    frames.write_u8((sample? as u8) ^ 0x80)?;
                }
            }
            SampleLayout::Signed16 => {
                for sample in int_samples(reader) {
                    frames.write_i16::<LittleEndian>(sample? as i16)?;
                }
            }
            SampleLayout::Signed24 => {
                for sample in int_samples(reader) {
                    frames.write_i24::<LittleEndian>(sample?)?;
                }
            }
            SampleLayout::Signed32 => {
                for sample in int_samples(reader) {
                    frames.write_i32::<LittleEndian>(sample?)?;
                }
            }
        }
        debug!(
            "read {} frame bytes of {}ch/{}Hz/{}bit audio",
            frames.len(),
            spec.channels,
            spec.sample_rate,
            spec.bits_per_sample
        );

        Ok(Self { spec, frames })
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    pub fn frames(&self) -> &[u8] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [u8] {
        &mut self.frames
    }

    /// One message bit per frame byte.
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    pub fn save_as(&self, file: &Path) -> Result<()> {
        let f = File::create(file).map_err(|e| {
            error!("Error creating file {file:?}: {e}");
            ChaostegoError::WriteError { source: e }
        })?;
        self.write_to(f)
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let layout = SampleLayout::of(&self.spec)?;
        let mut wav_writer =
            WavWriter::new(writer, self.spec).map_err(|_| ChaostegoError::AudioEncodingError)?;
        let sample_bytes = self.spec.bits_per_sample as usize / 8;
        let mut frames = Cursor::new(&self.frames[..]);

        for _ in 0..self.frames.len() / sample_bytes {
            let written = match layout {
                SampleLayout::Float32 => {
                    wav_writer.write_sample(frames.read_f32::<LittleEndian>()?)
                }
                SampleLayout::Unsigned8 => {
                    wav_writer.write_sample(i32::from((frames.read_u8()? ^ 0x80) as i8))
                }
                SampleLayout::Signed16 => {
                    wav_writer.write_sample(i32::from(frames.read_i16::<LittleEndian>()?))
                }
                SampleLayout::Signed24 => {
                    wav_writer.write_sample(frames.read_i24::<LittleEndian>()?)
                }
                SampleLayout::Signed32 => {
                    wav_writer.write_sample(frames.read_i32::<LittleEndian>()?)
                }
            };
            written.map_err(|e| {
                error!("Error writing audio sample: {e}");
                ChaostegoError::AudioEncodingError
            })?;
        }
        wav_writer
            .finalize()
            .map_err(|_| ChaostegoError::AudioEncodingError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(bits: u16, format: SampleFormat) -> WavSpec {
        WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: bits,
            sample_format: format,
        }
    }

    fn write_wav<S: hound::Sample + Copy>(spec: WavSpec, samples: &[S]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut buf, spec).expect("Cannot create writer");
            samples
                .iter()
                .for_each(|s| writer.write_sample(*s).expect("Cannot write sample"));
            writer.finalize().expect("Cannot finalize");
        }
        buf.into_inner()
    }

    #[test]
    fn should_lay_out_16_bit_samples_little_endian() {
        let wav = write_wav(spec(16, SampleFormat::Int), &[0x0102i16, -2, 7, 0]);
        let audio = PcmAudio::from_reader(&wav[..]).unwrap();
        assert_eq!(audio.frames(), &[0x02, 0x01, 0xFE, 0xFF, 0x07, 0x00, 0x00, 0x00]);
        assert_eq!(audio.capacity(), 8);
    }

    #[test]
    fn should_lay_out_32_bit_samples_little_endian() {
        let wav = write_wav(spec(32, SampleFormat::Int), &[1i32, -1]);
        let audio = PcmAudio::from_reader(&wav[..]).unwrap();
        assert_eq!(
            audio.frames(),
            &[0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn should_lay_out_8_bit_samples_unsigned() {
        let wav = write_wav(spec(8, SampleFormat::Int), &[-128i8, 0, 127, 1]);
        let audio = PcmAudio::from_reader(&wav[..]).unwrap();
        assert_eq!(audio.frames(), &[0x00, 0x80, 0xFF, 0x81]);
    }

    #[test]
    fn should_write_back_the_same_audio() {
        for (spec, wav) in [
            (
                spec(16, SampleFormat::Int),
                write_wav(spec(16, SampleFormat::Int), &[1i16, -1, 300, -300]),
            ),
            (
                spec(24, SampleFormat::Int),
                write_wav(spec(24, SampleFormat::Int), &[1i32, -1, 0x7F_FFFF, -0x80_0000]),
            ),
            (
                spec(8, SampleFormat::Int),
                write_wav(spec(8, SampleFormat::Int), &[1i8, -1, 100, -100]),
            ),
            (
                spec(32, SampleFormat::Float),
                write_wav(spec(32, SampleFormat::Float), &[0.5f32, -0.25, 1.0, 0.0]),
            ),
        ] {
            let audio = PcmAudio::from_reader(&wav[..]).unwrap();
            let mut out = Cursor::new(Vec::new());
            audio.write_to(&mut out).unwrap();
            let again = PcmAudio::from_reader(&out.get_ref()[..]).unwrap();

            assert_eq!(again.spec(), spec);
            assert_eq!(again.frames(), audio.frames());
        }
    }

    #[test]
    fn should_refuse_broken_audio() {
        match PcmAudio::from_reader(&b"RIFF but not really"[..]) {
            Err(ChaostegoError::CarrierOpenFailure { kind, .. }) => {
                assert_eq!(kind, CarrierKind::Audio)
            }
            other => panic!("expected CarrierOpenFailure, got {other:?}"),
        }
    }
}
