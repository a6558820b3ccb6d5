//! Logo image references.
//!
//! A logo is either a remote URL or an inlined `data:` URL. Only inlined logos
//! carry bytes the exporter and the image editor can work with.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::error::{AppError, Result};

/// Image shown before the user uploads their own logo.
pub const PLACEHOLDER_LOGO_URL: &str = "https://picsum.photos/200/200";

/// The logo currently attached to a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Logo {
    /// Image reachable by URL; exported HTML depends on it staying reachable.
    Url(String),
    /// Image bytes inlined as base64 with their MIME type.
    Inline { mime: String, data: String },
}

impl Logo {
    /// The placeholder logo.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::Url(PLACEHOLDER_LOGO_URL.to_string())
    }

    /// Inline raw image bytes.
    #[must_use]
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self::Inline {
            mime: mime.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Interpret an image reference: `data:<mime>;base64,<payload>` becomes an
    /// inline logo, anything else is kept as a URL.
    #[must_use]
    pub fn parse(src: &str) -> Self {
        src.strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .filter(|(mime, data)| !mime.is_empty() && !data.is_empty())
            .map_or_else(
                || Self::Url(src.to_string()),
                |(mime, data)| Self::Inline {
                    mime: mime.to_string(),
                    data: data.to_string(),
                },
            )
    }

    /// The string used as an `src` attribute.
    #[must_use]
    pub fn to_src(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Inline { mime, data } => format!("data:{mime};base64,{data}"),
        }
    }

    /// Whether the image bytes are embedded.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    /// MIME type of an inline logo.
    #[must_use]
    pub fn mime(&self) -> Option<&str> {
        match self {
            Self::Url(_) => None,
            Self::Inline { mime, .. } => Some(mime),
        }
    }

    /// Decode the inline payload.
    ///
    /// # Errors
    /// Returns `MissingLogo` for URL logos and `InvalidImage` for bad base64.
    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Url(_) => Err(AppError::MissingLogo),
            Self::Inline { data, .. } => STANDARD.decode(data).map_err(|e| AppError::InvalidImage {
                message: format!("logo payload is not valid base64: {e}"),
            }),
        }
    }

    /// Size of the payload as it appears in the reference.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        match self {
            Self::Url(url) => url.len(),
            Self::Inline { data, .. } => data.len(),
        }
    }
}

impl Default for Logo {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl std::fmt::Display for Logo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Inline { mime, data } => write!(f, "inline {mime} ({} base64 chars)", data.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url() {
        let logo = Logo::parse("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(
            logo,
            Logo::Inline {
                mime: "image/png".into(),
                data: "iVBORw0KGgo=".into()
            }
        );
        assert_eq!(logo.to_src(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_parse_plain_url() {
        let logo = Logo::parse(PLACEHOLDER_LOGO_URL);
        assert_eq!(logo, Logo::placeholder());
        assert!(!logo.is_inline());
    }

    #[test]
    fn test_parse_malformed_data_url_stays_url() {
        assert!(matches!(Logo::parse("data:image/png,abc"), Logo::Url(_)));
        assert!(matches!(Logo::parse("data:;base64,abc"), Logo::Url(_)));
    }

    #[test]
    fn test_from_bytes_roundtrip() {
        let logo = Logo::from_bytes("image/jpeg", &[0xFF, 0xD8, 0xFF]);
        assert_eq!(logo.mime(), Some("image/jpeg"));
        assert_eq!(logo.decode_bytes().unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_url_logo_has_no_bytes() {
        assert!(matches!(
            Logo::placeholder().decode_bytes(),
            Err(AppError::MissingLogo)
        ));
    }
}
