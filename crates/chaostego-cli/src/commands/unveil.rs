use std::path::PathBuf;

use chaostego_core::media::MarkerPolicy;
use chaostego_core::CodecOptions;
use clap::Args;

use crate::CliResult;

/// Unveils a text message and prints it to stdout
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Source media that contains the secret message
    #[arg(
        short = 'i',
        long = "in",
        value_name = "media source file",
        required = true
    )]
    pub media: PathBuf,

    /// Fail when no end marker is found instead of printing what was read
    #[arg(long)]
    pub strict: bool,
}

impl UnveilArgs {
    pub fn run(self, options: CodecOptions) -> CliResult<()> {
        let options = if self.strict {
            options.with_marker_policy(MarkerPolicy::Strict)
        } else {
            options
        };

        let message =
            chaostego_core::commands::unveil(&self.media, &options, &super::media_codecs())?;
        println!("{message}");

        Ok(())
    }
}
