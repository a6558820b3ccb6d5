//! Application layer - use cases and orchestration.
//!
//! This layer contains the editor session and the export pipeline that
//! turns a card snapshot into JPEG, PDF and HTML artifacts.

pub mod canvas;
pub mod editor;
pub mod export;
pub mod formatter;
pub mod html;
pub mod qr;
pub mod render;
pub mod session;
pub mod vcard;

pub use editor::ImageEditor;
pub use formatter::{format_card_table, format_saved, format_session_status};
pub use session::EditorSession;
pub use vcard::encode_vcard;
