use std::path::{Path, PathBuf};

use crate::media::{EmbedReport, MediaCodecs};
use crate::{ChaostegoError, CodecOptions};

pub fn prepare() -> HideApi {
    HideApi::default()
}

#[derive(Default)]
pub struct HideApi {
    message: Option<String>,
    carrier: Option<PathBuf>,
    output: Option<PathBuf>,
    options: CodecOptions,
    codecs: MediaCodecs,
}

impl HideApi {
    pub fn with_options(mut self, options: CodecOptions) -> Self {
        self.options = options;
        self
    }

    /// Needed for video carriers, images and audio work without.
    pub fn with_codecs(mut self, codecs: MediaCodecs) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn use_message<S: AsRef<str>>(mut self, message: Option<S>) -> Self {
        self.message = message.map(|s| s.as_ref().to_string());
        self
    }

    /// Image, audio or video, told apart by the file extension.
    pub fn with_carrier<A: AsRef<Path>>(mut self, carrier: A) -> Self {
        self.carrier = Some(carrier.as_ref().to_path_buf());
        self
    }

    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<EmbedReport, ChaostegoError> {
        let Some(message) = self.message else {
            return Err(ChaostegoError::MissingMessage);
        };
        let Some(carrier) = self.carrier else {
            return Err(ChaostegoError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(ChaostegoError::TargetNotSet);
        };

        crate::commands::hide(&carrier, &output, &message, &self.options, &self.codecs)
    }
}
