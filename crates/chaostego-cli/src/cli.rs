use chaostego_core::media::LsbImageOptions;
use chaostego_core::CodecOptions;
use clap::{Parser, Subcommand};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Experimental: image color channel step increment
    #[arg(long = "x-color-step-increment", default_value = "1", global = true)]
    pub color_step_increment: usize,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            image: LsbImageOptions {
                color_channel_step_increment: self.color_step_increment,
                ..LsbImageOptions::default()
            },
            ..CodecOptions::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Encrypt(transform::EncryptArgs),
    Decrypt(transform::DecryptArgs),
    Hide(hide::HideArgs),
    Unveil(unveil::UnveilArgs),
}
