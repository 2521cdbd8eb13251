use std::path::PathBuf;

use chaostego_core::media::CapacityPolicy;
use chaostego_core::CodecOptions;
use clap::Args;
use log::warn;

use crate::CliResult;

/// Hides a text message in PNG/JPEG/BMP images, WAV audio or video files
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Carrier file, used readonly
    #[arg(short = 'i', long = "in", value_name = "media file", required = true)]
    pub media: PathBuf,

    /// Carrier with the hidden message will be stored as file
    #[arg(short = 'o', long = "out", value_name = "output media file", required = true)]
    pub write_to_file: PathBuf,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message", required = true)]
    pub message: String,

    /// Hide as much of the message as fits instead of failing
    #[arg(long)]
    pub truncate: bool,
}

impl HideArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        let options = if self.truncate {
            options.with_capacity_policy(CapacityPolicy::Truncate)
        } else {
            options
        };

        let report = chaostego_core::commands::hide(
            &self.media,
            &self.write_to_file,
            &self.message,
            &options,
            &super::media_codecs(),
        )?;
        if report.is_truncated() {
            warn!(
                "only {} of {} bits were hidden",
                report.written_bits, report.needed_bits
            );
        }

        Ok(())
    }
}
