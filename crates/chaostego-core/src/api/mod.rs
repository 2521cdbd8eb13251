pub mod hide;
pub mod transform;
pub mod unveil;
