//! Input/output: files, command line, logging and progress

/// Command-line parsing and command execution
pub mod cli;
/// Constants and runtime configuration defaults
pub mod configuration;
/// Error types shared across the crate
pub mod error;
/// Mask, stencil and image file handling
pub mod image;
/// Console log backend
pub mod logging;
/// Patch cropping, pasting and coordinate records
pub mod patch;
/// Batch progress display
pub mod progress;
