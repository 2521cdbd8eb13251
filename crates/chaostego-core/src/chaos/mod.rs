//! Dual logistic map keystream and the image cipher built on top of it.

pub mod cipher;
pub mod keystream;
mod parameters;

pub use cipher::ImageCipher;
pub use keystream::{generate, quantize, Keystream, LogisticMap};
pub use parameters::{parse_parameter, ChaoticParameters};
