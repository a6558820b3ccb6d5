//! Terminal views of the editor session.

use std::path::Path;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use super::session::EditorSession;
use crate::domain::{Artifact, CardData, CardField, Logo};

/// Formats the card fields as a table.
pub fn format_card_table(card: &CardData) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Label", "Value"]);

    for field in CardField::ALL {
        let value = card.get(field);
        let shown = if value.is_empty() {
            "-".to_string()
        } else {
            truncate(&value.replace('\n', " / "), 48)
        };
        table.add_row(vec![field.key(), field.label(), &shown]);
    }

    table.to_string()
}

/// Formats logo, options, prompt and the current error.
pub fn format_session_status(session: &EditorSession) -> String {
    let options = session.options();
    let undo = if session.can_undo() {
        "undo available".green()
    } else {
        "nothing to undo".dimmed()
    };

    let mut out = format!(
        "{}\n  Logo: {} ({} in history, {})\n  QR code: {}\n  Layout: {}",
        "🪪 Session".bold(),
        describe_logo(session.logo()).cyan(),
        session.history_len(),
        undo,
        if options.show_qr_code { "on".green() } else { "off".yellow() },
        options.direction.to_string().cyan(),
    );

    if !session.prompt().trim().is_empty() {
        out.push_str(&format!("\n  Prompt: {}", truncate(session.prompt(), 60)));
    }
    if let Some(error) = session.error() {
        out.push_str(&format!("\n  {}", error.red()));
    }
    out
}

/// Formats the confirmation for a saved export.
pub fn format_saved(artifact: &Artifact, path: &Path) -> String {
    format!(
        "{} {} ({} bytes)",
        "✓".green(),
        path.display().to_string().cyan(),
        artifact.bytes.len()
    )
}

fn describe_logo(logo: &Logo) -> String {
    match logo {
        Logo::Url(url) => format!("placeholder {url}"),
        Logo::Inline { mime, .. } => format!("uploaded {mime}, {} base64 chars", logo.payload_len()),
    }
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
