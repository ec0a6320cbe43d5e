//! Compressor drivers

pub mod bldc;

pub use bldc::{BldcCompressor, BldcConfig};
