//! # Chaostego Core API
//!
//! Two independent tool families live here:
//! - a symmetric image cipher, see [`chaos::ImageCipher`], that XORs every RGB
//!   byte with a keystream of two coupled logistic maps
//! - LSB steganography for images, WAV audio and video frames, see
//!   [`media::Carrier`]
//!
//! # Usage Examples
//!
//! ## Encrypt an image
//!
//! ```rust,no_run
//! use chaostego_core::chaos::ChaoticParameters;
//!
//! chaostego_core::api::transform::prepare()
//!     .with_image("photo.png")
//!     .with_parameters(ChaoticParameters::new(3.9, 0.5, 3.95, 0.7))
//!     .with_output("encrypted.png")
//!     .execute()
//!     .expect("Failed to encrypt image");
//! ```
//!
//! ## Hide a message inside an audio file
//!
//! ```rust,no_run
//! chaostego_core::api::hide::prepare()
//!     .with_message("Hello, World!")
//!     .with_carrier("song.wav")
//!     .with_output("song-with-secret.wav")
//!     .execute()
//!     .expect("Failed to hide message");
//!
//! let message = chaostego_core::api::unveil::prepare()
//!     .from_secret_file("song-with-secret.wav")
//!     .execute()
//!     .expect("Failed to unveil message");
//! assert_eq!(message, "Hello, World!");
//! ```

#![warn(clippy::redundant_else)]

pub mod bit_iterator;
pub use bit_iterator::BitIterator;

pub mod api;
pub mod bitstream;
pub mod chaos;
pub mod commands;
pub mod error;
pub mod media;
pub mod result;

pub use crate::error::ChaostegoError;
pub use crate::media::CodecOptions;
pub use crate::result::Result;
