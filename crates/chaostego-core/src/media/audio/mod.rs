pub mod lsb_codec;
pub mod pcm;

pub use lsb_codec::{AudioSteganographer, LsbCodec};
pub use pcm::PcmAudio;
