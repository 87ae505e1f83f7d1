//! Input/output surfaces around the synthesis core

/// Command-line parsing and batch file processing
pub mod cli;
/// Constants and runtime configuration
pub mod configuration;
/// Error type and context helpers
pub mod error;
/// PNG loading and raster export
pub mod image;
/// Terminal progress display
pub mod progress;
/// Cut map rendering
pub mod visualization;
