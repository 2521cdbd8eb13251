use std::fmt;
use std::path::Path;

use log::warn;

use crate::bitstream::Decoded;
use crate::error::ChaostegoError;
use crate::media::{CapacityPolicy, MarkerPolicy};
use crate::result::Result;

pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
pub const AUDIO_EXTENSIONS: [&str; 1] = ["wav"];
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "avi", "mkv"];

/// The modality of a carrier, decided once by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrierKind {
    Image,
    Audio,
    Video,
}

impl CarrierKind {
    /// Case insensitive, without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        let ext = ext.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            Some(Self::Image)
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            Some(Self::Audio)
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Some(Self::Video)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                ChaostegoError::UnsupportedCarrierType(
                    path.extension()
                        .or_else(|| path.file_name())
                        .map(|e| e.to_string_lossy().to_string())
                        .unwrap_or_default(),
                )
            })
    }
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarrierKind::Image => write!(f, "Image"),
            CarrierKind::Audio => write!(f, "Audio"),
            CarrierKind::Video => write!(f, "Video"),
        }
    }
}

/// How much of a message made it into a carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// message bits including framing or end marker
    pub needed_bits: usize,
    pub written_bits: usize,
}

impl EmbedReport {
    pub fn new(needed_bits: usize, written_bits: usize) -> Self {
        Self {
            needed_bits,
            written_bits,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.written_bits < self.needed_bits
    }

    pub(crate) fn warn_if_truncated(&self, carrier: &str) {
        if self.is_truncated() {
            warn!(
                "{carrier} carrier too small, message truncated to {} of {} bits",
                self.written_bits, self.needed_bits
            );
        }
    }
}

pub(crate) fn check_capacity(needed: usize, available: usize, policy: CapacityPolicy) -> Result<()> {
    if needed > available && policy == CapacityPolicy::Reject {
        return Err(ChaostegoError::CapacityExceeded { needed, available });
    }
    Ok(())
}

pub(crate) fn conclude_reveal(decoded: Decoded, policy: MarkerPolicy) -> Result<String> {
    if !decoded.marker_found {
        if policy == MarkerPolicy::Strict {
            return Err(ChaostegoError::MarkerNotFound);
        }
        warn!(
            "no end marker within {} bits, returning what was collected",
            decoded.consumed_bits
        );
    }
    Ok(decoded.message)
}
