pub mod hide;
pub mod transform;
pub mod unveil;

use std::sync::Arc;

use chaostego_core::media::video::AviCodec;
use chaostego_core::media::MediaCodecs;

/// Codecs of the command line tool, video files are read and written as uncompressed AVI.
pub fn media_codecs() -> MediaCodecs {
    MediaCodecs::default().with_video_codec(Arc::new(AviCodec))
}
