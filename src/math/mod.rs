//! Mathematical utilities for the optimizer

/// `OKLab` perceptual color space conversion and distance
pub mod oklab;
