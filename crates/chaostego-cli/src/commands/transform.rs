use std::path::PathBuf;

use chaostego_core::chaos::ChaoticParameters;
use clap::Args;

use crate::CliResult;

/// Growth rates and seeds of both logistic maps, parsed by the core so bad
/// values surface as an invalid parameter error.
#[derive(Args, Debug)]
pub struct ChaosArgs {
    /// Source image, PNG, JPEG or BMP
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub image: PathBuf,

    /// Resulting image, always written as PNG
    #[arg(short = 'o', long = "out", value_name = "output image file", required = true)]
    pub write_to_file: PathBuf,

    /// Growth rate of the first logistic map [default: 3.9]
    #[arg(long, value_name = "r1")]
    pub r1: Option<String>,

    /// Seed of the first logistic map [default: 0.5]
    #[arg(long, value_name = "x01")]
    pub x01: Option<String>,

    /// Growth rate of the second logistic map [default: 3.95]
    #[arg(long, value_name = "r2")]
    pub r2: Option<String>,

    /// Seed of the second logistic map [default: 0.7]
    #[arg(long, value_name = "x02")]
    pub x02: Option<String>,
}

impl ChaosArgs {
    fn parameters(&self) -> CliResult<ChaoticParameters> {
        ChaoticParameters::parse(
            self.r1.as_deref(),
            self.x01.as_deref(),
            self.r2.as_deref(),
            self.x02.as_deref(),
        )
    }
}

/// Encrypts an image with the chaotic keystream
#[derive(Args, Debug)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub chaos: ChaosArgs,
}

impl EncryptArgs {
    pub fn run(self) -> CliResult<()> {
        let params = self.chaos.parameters()?;
        chaostego_core::commands::encrypt(&self.chaos.image, &self.chaos.write_to_file, &params)
    }
}

/// Decrypts an image, needs the parameters it was encrypted with
#[derive(Args, Debug)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub chaos: ChaosArgs,
}

impl DecryptArgs {
    pub fn run(self) -> CliResult<()> {
        let params = self.chaos.parameters()?;
        chaostego_core::commands::decrypt(&self.chaos.image, &self.chaos.write_to_file, &params)
    }
}
