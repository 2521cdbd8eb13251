use clap::Parser;
use cli::{CliArgs, Commands};

mod cli;
mod commands;

pub type CliResult<T> = chaostego_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let options = args.codec_options();

    match args.command {
        Commands::Encrypt(encrypt) => encrypt.run(),
        Commands::Decrypt(decrypt) => decrypt.run(),
        Commands::Hide(hide) => hide.run(options),
        Commands::Unveil(unveil) => unveil.run(options),
    }
}
