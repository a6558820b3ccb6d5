//! Domain-level error types for josera-card.
//!
//! All errors are typed with `thiserror`. The editor session maps them to the
//! short user-facing messages it shows; the `Display` text here is meant for
//! logs and CLI diagnostics.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Unknown card field name.
    #[error("Unknown card field: {name}")]
    InvalidField { name: String },

    /// Malformed user input (CLI arguments, interactive commands).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The edit prompt was empty after trimming.
    #[error("Edit prompt is empty")]
    EmptyPrompt,

    /// There is no uploaded logo the image editor can work on.
    #[error("Please upload a logo/image first.")]
    MissingLogo,

    /// An image edit request is already outstanding.
    #[error("An image edit is already in progress")]
    EditInFlight,

    /// The logo changed while an image edit was running.
    #[error("The logo changed during the edit; the result was discarded")]
    StaleEdit,

    /// Uploaded bytes are not a decodable image.
    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    /// Uploaded logo exceeds the configured size limit.
    #[error("Logo is {size} bytes, limit is {limit} bytes")]
    LogoTooLarge { size: u64, limit: u64 },

    /// The image editor service rejected the request.
    #[error("Image editor error: {message}")]
    ImageEditor { message: String },

    /// The image editor answered without an image part.
    #[error("No image generated in response")]
    NoImageProduced,

    /// Transport-level HTTP failure.
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Painting or encoding the card snapshot failed.
    #[error("Render error: {message}")]
    Render { message: String },

    /// The contact record could not be encoded as a QR symbol.
    #[error("QR encoding error: {message}")]
    Qr { message: String },

    /// Building or serializing the PDF document failed.
    #[error("PDF error: {message}")]
    Pdf { message: String },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl AppError {
    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an HTTP error from a reqwest error.
    pub fn http(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a PDF error from a document-writer failure.
    pub fn pdf(err: impl std::fmt::Display) -> Self {
        Self::Pdf {
            message: err.to_string(),
        }
    }

    /// Create a render error with context.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
