//! Infrastructure layer - external adapters (filesystem, network, PDF, fonts).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod files;
pub mod fonts;
pub mod gemini;
pub mod pdf;

pub use config::{
    config_file_path, ensure_config_exists, load_config, load_config_from_file, save_config,
};
pub use files::{read_logo_file, save_artifact};
pub use fonts::discover_font;
pub use gemini::GeminiClient;
pub use pdf::single_page_pdf;
