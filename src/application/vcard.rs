//! Contact record (vCard 3.0) encoding.
//!
//! Values are escaped per RFC 2426 TEXT rules. The address is the exception:
//! its lines become comma-separated street values, so commas there are list
//! separators rather than escaped characters.

use crate::domain::CardData;

const CRLF: &str = "\r\n";

/// Serialize a card into a vCard 3.0 record.
///
/// Identical cards always produce byte-identical output.
#[must_use]
pub fn encode_vcard(card: &CardData) -> String {
    let lines = [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape_text(&card.name)),
        format!("ORG:{}", escape_text(&card.company)),
        format!("TITLE:{}", escape_text(&card.title)),
        format!("TEL;TYPE=WORK,VOICE:{}", escape_text(&card.phone)),
        format!("EMAIL;TYPE=WORK,INTERNET:{}", escape_text(&card.email)),
        format!("URL;TYPE=WORK:{}", uri_value(&normalize_website(&card.website))),
        format!("ADR;TYPE=WORK:;;{};;;;", street_value(&card.address)),
        format!("NOTE:{}", escape_text(&card.description)),
        "END:VCARD".to_string(),
    ];

    let mut out = lines.join(CRLF);
    out.push_str(CRLF);
    out
}

/// Prefix `https://` unless the website already carries an http(s) scheme.
#[must_use]
pub fn normalize_website(website: &str) -> String {
    let trimmed = website.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Escape a TEXT value.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, line) in split_lines(value).enumerate() {
        if i > 0 {
            out.push_str("\\n");
        }
        for ch in line.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                ';' => out.push_str("\\;"),
                ',' => out.push_str("\\,"),
                _ => out.push(ch),
            }
        }
    }
    out
}

/// Street component of ADR: every line, blank ones included, joined by `", "`.
fn street_value(address: &str) -> String {
    split_lines(address)
        .map(|line| line.replace('\\', "\\\\").replace(';', "\\;"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// URI values are not TEXT; only line breaks are removed.
fn uri_value(uri: &str) -> String {
    uri.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// Split on `\r\n`, `\r` or `\n`.
fn split_lines(value: &str) -> impl Iterator<Item = &str> {
    value
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .flat_map(|l| l.split('\r'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CardField;

    fn line<'a>(record: &'a str, prefix: &str) -> &'a str {
        record
            .lines()
            .find(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("missing {prefix} line in {record}"))
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website(""), "");
        assert_eq!(normalize_website("example.com"), "https://example.com");
        assert_eq!(normalize_website("http://example.com"), "http://example.com");
        assert_eq!(normalize_website("https://example.com"), "https://example.com");
        assert_eq!(normalize_website("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(normalize_website("  www.x.id "), "https://www.x.id");
    }

    #[test]
    fn test_record_layout() {
        let record = encode_vcard(&CardData::sample());
        let lines: Vec<&str> = record.split("\r\n").collect();

        assert_eq!(lines[0], "BEGIN:VCARD");
        assert_eq!(lines[1], "VERSION:3.0");
        assert_eq!(lines[2], "FN:Frianti");
        assert_eq!(lines[3], "ORG:PT Josera Global Solusindo");
        assert_eq!(lines[4], "TITLE:Sales Manager");
        assert_eq!(lines[5], "TEL;TYPE=WORK,VOICE:+62 812-6695-1503");
        assert_eq!(lines[6], "EMAIL;TYPE=WORK,INTERNET:sales@joseraglobalitsolusindo.com");
        assert_eq!(lines[7], "URL;TYPE=WORK:https://www.joseraglobalitsolusindo.com");
        assert_eq!(lines[8], "ADR;TYPE=WORK:;;Grand Galaxy City, RGA 53, Bekasi;;;;");
        assert_eq!(lines[10], "END:VCARD");
        assert_eq!(lines[11], "");
    }

    #[test]
    fn test_address_and_website_scenario() {
        let card = CardData::default()
            .with_field(CardField::Website, "joseraglobalitsolusindo.com")
            .with_field(CardField::Address, "Line1\nLine2");
        let record = encode_vcard(&card);

        assert!(line(&record, "ADR").contains("Line1, Line2"));
        assert!(line(&record, "URL").contains("https://joseraglobalitsolusindo.com"));
    }

    #[test]
    fn test_street_keeps_lines_verbatim() {
        let card = CardData::default().with_field(CardField::Address, " Block A\n\nBekasi");
        let record = encode_vcard(&card);

        assert_eq!(line(&record, "ADR"), "ADR;TYPE=WORK:;; Block A, , Bekasi;;;;");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let card = CardData::sample().with_field(CardField::Address, "A\r\nB\nC");
        assert_eq!(encode_vcard(&card), encode_vcard(&card.clone()));
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let card = CardData::default()
            .with_field(CardField::Company, "Acme, Inc; Labs")
            .with_field(CardField::Description, "back\\slash\nsecond line");
        let record = encode_vcard(&card);

        assert_eq!(line(&record, "ORG"), "ORG:Acme\\, Inc\\; Labs");
        assert_eq!(line(&record, "NOTE"), "NOTE:back\\\\slash\\nsecond line");
    }

    #[test]
    fn test_empty_card_still_has_every_property() {
        let record = encode_vcard(&CardData::default());

        assert!(record.contains("\r\nFN:\r\n"));
        assert!(record.contains("\r\nURL;TYPE=WORK:\r\n"));
        assert!(record.contains("\r\nADR;TYPE=WORK:;;;;;;\r\n"));
        assert_eq!(record.lines().count(), 11);
    }
}
