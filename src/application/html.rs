//! Standalone interactive HTML export.
//!
//! The document is built with `maud`, so every card field is escaped on
//! interpolation. Only the fixed stylesheet, the flip handler and the icon
//! SVGs below are emitted pre-escaped.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::qr::QrImage;
use crate::domain::{CardData, Logo};

/// Utility-class framework referenced by the exported page.
pub const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Web font referenced by the exported page.
pub const INTER_FONT: &str =
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap";

/// Class carried by the QR `<img>`; exactly one per document when enabled.
pub const QR_IMG_CLASS: &str = "qr-code";

const QR_IMG_CLASSES: &str = "qr-code w-16 h-16 object-contain";

const BACK_STYLE: &str = "background-color: #5D4B78;";

const FLIP_HANDLER: &str = "this.querySelector('.card-inner').classList.toggle('flipped')";

const FLIP_CSS: &str = "
        body { font-family: 'Inter', sans-serif; background-color: #f3f4f6; display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; }
        .perspective-1000 { perspective: 1000px; }
        .transform-style-3d { transform-style: preserve-3d; }
        .backface-hidden { backface-visibility: hidden; -webkit-backface-visibility: hidden; }
        .rotate-y-180 { transform: rotateY(180deg); }
        .card-inner { transition: transform 0.8s; }
        .flipped { transform: rotateY(180deg); }
    ";

const ICON_FLIP: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M21 12a9 9 0 0 0-9-9 9.75 9.75 0 0 0-6.74 2.74L3 8"/><path d="M3 3v5h5"/><path d="M3 12a9 9 0 0 0 9 9 9.75 9.75 0 0 0 6.74-2.74L21 16"/><path d="M16 16h5v5"/></svg>"#;

const ICON_PHONE: &str = r##"<svg width="12" height="12" viewBox="0 0 24 24" fill="none" stroke="#FACC15" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M22 16.92v3a2 2 0 0 1-2.18 2 19.79 19.79 0 0 1-8.63-3.07 19.5 19.5 0 0 1-6-6 19.79 19.79 0 0 1-3.07-8.67A2 2 0 0 1 4.11 2h3a2 2 0 0 1 2 1.72 12.84 12.84 0 0 0 .7 2.81 2 2 0 0 1-.45 2.11L8.09 9.91a16 16 0 0 0 6 6l1.27-1.27a2 2 0 0 1 2.11-.45 12.84 12.84 0 0 0 2.81.7A2 2 0 0 1 22 16.92z"/></svg>"##;

const ICON_MAIL: &str = r##"<svg width="12" height="12" viewBox="0 0 24 24" fill="none" stroke="#FACC15" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><rect width="20" height="16" x="2" y="4" rx="2"/><path d="m22 7-8.97 5.7a1.94 1.94 0 0 1-2.06 0L2 7"/></svg>"##;

const ICON_GLOBE: &str = r##"<svg width="12" height="12" viewBox="0 0 24 24" fill="none" stroke="#FACC15" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><circle cx="12" cy="12" r="10"/><line x1="2" x2="22" y1="12" y2="12"/><path d="M12 2a15.3 15.3 0 0 1 4 10 15.3 15.3 0 0 1-4 10 15.3 15.3 0 0 1-4-10 15.3 15.3 0 0 1 4-10z"/></svg>"##;

const ICON_PIN: &str = r##"<svg width="12" height="12" viewBox="0 0 24 24" fill="none" stroke="#FACC15" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><path d="M20 10c0 6-8 12-8 12s-8-6-8-12a8 8 0 0 1 16 0Z"/><circle cx="12" cy="10" r="3"/></svg>"##;

/// Build the complete flip-card document.
///
/// `qr` is embedded on the back face when present.
#[must_use]
pub fn build_card_html(card: &CardData, logo: &Logo, qr: Option<&QrImage>) -> String {
    let logo_src = logo.to_src();

    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (card.name) " - Digital Business Card" }
                script src=(TAILWIND_CDN) {}
                link href=(INTER_FONT) rel="stylesheet";
                style { (PreEscaped(FLIP_CSS)) }
            }
            body {
                div class="perspective-1000 w-full max-w-[400px] h-[240px] cursor-pointer group" onclick=(FLIP_HANDLER) {
                    div class="card-inner relative w-full h-full transform-style-3d shadow-xl rounded-xl bg-white" {
                        (front_face(card, &logo_src))
                        (back_face(card, &logo_src, qr))
                    }
                }
            }
        }
    };

    markup.into_string()
}

fn front_face(card: &CardData, logo_src: &str) -> Markup {
    html! {
        div class="absolute w-full h-full backface-hidden rounded-xl overflow-hidden bg-white border border-gray-100 flex flex-col items-center justify-center p-6 text-center" {
            div class="w-32 h-32 relative flex items-center justify-center p-4 bg-white rounded-2xl shadow-sm border border-gray-100 mb-4" {
                img src=(logo_src) alt="Company Logo" class="w-full h-full object-contain drop-shadow-sm";
            }
            div {
                h2 class="text-lg font-bold text-gray-800 tracking-tight leading-none mb-1" { (card.company) }
                p class="text-[10px] text-red-500 font-semibold uppercase tracking-wide mb-2" { (card.tagline) }
                @if !card.description.is_empty() {
                    p class="text-[9px] text-gray-500 max-w-[80%] mx-auto leading-tight" { (card.description) }
                }
            }
            div class="absolute bottom-4 right-4 text-gray-300" {
                (PreEscaped(ICON_FLIP))
            }
        }
    }
}

fn back_face(card: &CardData, logo_src: &str, qr: Option<&QrImage>) -> Markup {
    html! {
        div class="absolute w-full h-full backface-hidden rotate-y-180 rounded-xl overflow-hidden p-8 text-white flex flex-col justify-between" style=(BACK_STYLE) {
            div class="absolute inset-0 opacity-10 pointer-events-none" style="background-image: radial-gradient(circle at 2px 2px, white 1px, transparent 0); background-size: 20px 20px;" {}
            div class="absolute inset-0 flex items-center justify-center z-0 pointer-events-none overflow-hidden" {
                img src=(logo_src) alt="" class="w-64 h-64 object-contain opacity-5 grayscale transform -rotate-12 scale-150 mix-blend-screen";
            }

            div class="relative z-10" {
                h1 class="text-xl font-bold tracking-wide" { (card.name) }
                p class="text-xs text-yellow-400 font-medium uppercase tracking-wider mt-1" { (card.title) }
                div class="w-12 h-1 bg-yellow-400 mt-3 rounded-full" {}
            }

            div class="relative z-10 flex justify-between items-end mt-2" {
                div class="space-y-2 flex-1 min-w-0 pr-2" {
                    (contact_row(ICON_PHONE, &card.phone))
                    (contact_row(ICON_MAIL, &card.email))
                    (contact_row(ICON_GLOBE, &card.website))
                    @if !card.address.is_empty() {
                        div class="flex items-start space-x-3 text-[10px]" {
                            div class="p-1.5 bg-white/10 rounded-full flex-shrink-0 mt-0.5" { (PreEscaped(ICON_PIN)) }
                            span class="font-light tracking-wide text-[8px] leading-tight whitespace-pre-wrap" { (card.address) }
                        }
                    }
                }
                @if let Some(qr) = qr {
                    div class="bg-white p-1 rounded-lg shadow-lg z-20 flex-shrink-0 ml-1" {
                        img src=(qr.data_url) alt="Contact QR" class=(QR_IMG_CLASSES);
                    }
                }
            }
        }
    }
}

fn contact_row(icon: &'static str, value: &str) -> Markup {
    html! {
        div class="flex items-center space-x-3 text-[10px]" {
            div class="p-1.5 bg-white/10 rounded-full flex-shrink-0" { (PreEscaped(icon)) }
            span class="font-light tracking-wide truncate" { (value) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::qr::encode_qr;
    use crate::application::vcard::encode_vcard;
    use crate::domain::CardField;

    #[test]
    fn test_document_skeleton() {
        let html = build_card_html(&CardData::sample(), &Logo::placeholder(), None);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Frianti - Digital Business Card</title>"));
        assert!(html.contains(TAILWIND_CDN));
        assert!(html.contains(".flipped { transform: rotateY(180deg); }"));
        assert!(html.contains("classList.toggle"));
        assert!(html.contains("PT Josera Global Solusindo"));
        assert!(html.contains("Sales Manager"));
    }

    #[test]
    fn test_logo_is_embedded_as_given() {
        let logo = Logo::from_bytes("image/png", b"logo-bytes");
        let html = build_card_html(&CardData::sample(), &logo, None);

        // Front face and watermark.
        assert_eq!(html.matches(&logo.to_src()).count(), 2);
    }

    #[test]
    fn test_no_qr_element_without_qr() {
        let html = build_card_html(&CardData::sample(), &Logo::placeholder(), None);
        assert!(!html.contains(QR_IMG_CLASS));
        assert!(!html.contains("Contact QR"));
    }

    #[test]
    fn test_exactly_one_qr_matching_record() {
        let card = CardData::sample();
        let qr = encode_qr(&encode_vcard(&card)).unwrap();
        let html = build_card_html(&card, &Logo::placeholder(), Some(&qr));

        assert_eq!(html.matches(QR_IMG_CLASS).count(), 1);
        assert_eq!(html.matches("data:image/png;base64,").count(), 1);
        assert!(html.contains(&qr.data_url));
    }

    #[test]
    fn test_fields_are_escaped() {
        let card = CardData::sample()
            .with_field(CardField::Name, "<script>alert(1)</script>")
            .with_field(CardField::Company, "Tom & \"Jerry\"");
        let html = build_card_html(&card, &Logo::placeholder(), None);

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; &quot;Jerry&quot;"));
    }

    #[test]
    fn test_empty_card_renders() {
        let html = build_card_html(&CardData::default(), &Logo::placeholder(), None);
        assert!(html.contains("<title> - Digital Business Card</title>"));
        assert!(html.ends_with("</html>"));
    }
}
