//! Domain layer - core card types and errors.
//!
//! This layer contains the card value objects, logo history and export
//! vocabulary without any IO.

pub mod card;
pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod logo;

pub use card::{CardData, CardField};
pub use config::{AppConfig, EditorConfig, ExportConfig};
pub use error::{AppError, Result};
pub use export::{Artifact, Direction, ExportFormat, ExportOptions};
pub use history::LogoHistory;
pub use logo::Logo;
