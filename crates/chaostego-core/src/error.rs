use thiserror::Error;

use crate::media::CarrierKind;

#[derive(Error, Debug)]
pub enum ChaostegoError {
    /// Represents a chaotic map parameter that is not a number, for example `r1=abc`
    #[error("Invalid chaotic parameter {name}: {value:?} is not a number")]
    InvalidParameter { name: &'static str, value: String },

    /// Represents a carrier whose file extension is none of the known image, audio or video types
    #[error("Unsupported carrier type: {0}")]
    UnsupportedCarrierType(String),

    /// Represents carrier bytes that could not be decoded, for example a broken WAV file
    #[error("{kind} carrier could not be opened: {reason}")]
    CarrierOpenFailure { kind: CarrierKind, reason: String },

    /// Represents a message that does not fit into the carrier, including the end marker
    #[error("Capacity Error: the message needs {needed} carrier bits, but only {available} are available")]
    CapacityExceeded { needed: usize, available: usize },

    /// Represents a reveal that ran through the whole carrier without hitting the end marker
    #[error("No end marker found in the carrier")]
    MarkerNotFound,

    /// Represents a WAV layout that has no raw frame byte representation here
    #[error("Unsupported audio format: {bits_per_sample} bits {sample_format}")]
    UnsupportedAudioFormat {
        bits_per_sample: u16,
        sample_format: &'static str,
    },

    /// Represents a video carrier for which no video codec was registered
    #[error("No video codec registered for {0}")]
    VideoCodecMissing(String),

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents a failure when encoding an audio file.
    #[error("Audio encoding error")]
    AudioEncodingError,

    /// Represents a failure when encoding a video frame.
    #[error("Video encoding error: {0}")]
    VideoEncodingError(String),

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("No carrier media set")]
    CarrierNotSet,

    #[error("No target file set")]
    TargetNotSet,

    #[error("API Error: Missing message")]
    MissingMessage,
}
