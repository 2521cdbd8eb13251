use std::path::{Path, PathBuf};

use crate::media::MediaCodecs;
use crate::{ChaostegoError, CodecOptions};

pub fn prepare() -> UnveilApi {
    UnveilApi::default()
}

#[derive(Default)]
pub struct UnveilApi {
    secret_media: Option<PathBuf>,
    options: CodecOptions,
    codecs: MediaCodecs,
}

impl UnveilApi {
    /// Use the given codec options
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_codecs(mut self, codecs: MediaCodecs) -> Self {
        self.codecs = codecs;
        self
    }

    /// This is the image, audio or video that contains the message
    pub fn from_secret_file(mut self, secret_media: impl AsRef<Path>) -> Self {
        self.secret_media = Some(secret_media.as_ref().to_path_buf());
        self
    }

    /// Returns the hidden message, empty if there is none and the marker policy is lenient.
    pub fn execute(self) -> Result<String, ChaostegoError> {
        let Some(secret_media) = self.secret_media else {
            return Err(ChaostegoError::CarrierNotSet);
        };

        crate::commands::unveil(&secret_media, &self.options, &self.codecs)
    }
}
