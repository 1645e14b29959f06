//! # Pixeloid I/O
//!
//! Editor settings files (human-readable JSON) and process-wide logging setup.

pub mod logging;
pub mod settings;

pub use logging::init_logging;
pub use settings::{EditorSettings, SettingsError};
