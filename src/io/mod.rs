//! Input/output: errors, configuration, image files, layout export, CLI

/// Command-line interface and the end-to-end quilt processor
pub mod cli;
/// Tuning constants, defaults, and JSON configuration loading
pub mod configuration;
/// Error type shared by the whole crate
pub mod error;
/// Tile image decoding and quilt rendering
pub mod image;
/// Layout JSON export
pub mod layout;
/// Terminal progress display
pub mod progress;
