//! Input/output shell around the optimizer core
//!
//! Everything in here is thin: PNG export, the command-line batch driver,
//! progress display, runtime configuration, and the crate error type. The
//! optimizer itself performs no I/O.

/// Command-line interface for batch processing PNG files
pub mod cli;
/// Algorithm constants and runtime configuration
pub mod configuration;
/// Error types for solver and shell operations
pub mod error;
/// Board rendering and PNG export
pub mod image;
/// Progress display for preprocessing and optimization phases
pub mod progress;
