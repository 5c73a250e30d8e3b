//! CLI command implementations.

pub mod attenuation;
pub mod common;
pub mod directivity;
pub mod duty;
pub mod field;
pub mod individual;
pub mod lpf;
pub mod phase;
pub mod saturation;
