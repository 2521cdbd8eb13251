pub mod audio;
pub mod carrier;
pub mod codec_options;
pub mod image;
mod primitives;
mod types;
pub mod video;

pub use carrier::{AudioCarrier, Carrier, ImageCarrier, MediaCodecs, Steganographer, VideoCarrier};
pub use codec_options::{CapacityPolicy, CodecOptions, ColorPlane, LsbImageOptions, MarkerPolicy};
pub use primitives::*;
pub use types::*;
