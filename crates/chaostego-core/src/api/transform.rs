use std::path::{Path, PathBuf};

use crate::chaos::ChaoticParameters;
use crate::commands::Direction;
use crate::ChaostegoError;

pub fn prepare() -> TransformApi {
    TransformApi::default()
}

/// Encrypts or decrypts an image, the chaotic transform is its own inverse.
#[derive(Default, Debug)]
pub struct TransformApi {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    parameters: ChaoticParameters,
    direction: Direction,
}

impl TransformApi {
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// The result is always written as PNG, whatever the extension says.
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn with_parameters(mut self, parameters: ChaoticParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Only changes what gets logged.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn execute(self) -> Result<(), ChaostegoError> {
        let Some(image) = self.image else {
            return Err(ChaostegoError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(ChaostegoError::TargetNotSet);
        };

        crate::commands::transform(&image, &output, &self.parameters, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn illustrate_api_usage() {
        let temp_dir = tempdir().expect("Failed to create temporary directory");
        let plain = temp_dir.path().join("plain.png");
        let encrypted = temp_dir.path().join("encrypted.png");
        let decrypted = temp_dir.path().join("decrypted.png");
        let image = RgbImage::from_fn(7, 3, |x, y| Rgb([x as u8, y as u8, (x * y) as u8]));
        image.save(&plain).expect("Failed to write carrier");

        prepare()
            .with_image(&plain)
            .with_output(&encrypted)
            .with_direction(Direction::Encrypt)
            .execute()
            .expect("Failed to encrypt image");
        prepare()
            .with_image(&encrypted)
            .with_output(&decrypted)
            .with_direction(Direction::Decrypt)
            .execute()
            .expect("Failed to decrypt image");

        let restored = image::open(&decrypted).unwrap().to_rgb8();
        assert_eq!(restored, image);
    }

    #[test]
    fn should_insist_on_an_output() {
        let result = prepare().with_image("whatever.png").execute();
        assert!(matches!(result, Err(ChaostegoError::TargetNotSet)));
    }
}
