//! Interactive editing loop.
//!
//! Reads one command per line from stdin. Operation errors are printed and
//! the loop continues; only stdin failures end it early.

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{unescape_newlines, FormatSelection};
use crate::application::{
    encode_vcard, format_card_table, format_saved, format_session_status, EditorSession,
};
use crate::domain::{AppError, CardField, Direction, Logo, Result};
use crate::infrastructure::{read_logo_file, save_artifact, GeminiClient};

const HELP: &str = "\
Commands:
  show                          Show the card and session status
  set <field> <value...>        Change a field (\\n inserts a line break)
  upload <path|data-url>        Upload a logo image
  prompt <text...>              Set the logo edit instruction
  ai [text...]                  Edit the logo with the current (or given) instruction
  undo                          Revert the last logo edit
  qr on|off                     Toggle the QR code on the card back
  direction row|column          Face layout for JPEG/PDF
  export jpg|pdf|html|all       Export the card
  vcard                         Print the contact record
  help                          Show this help
  quit                          Leave the editor";

/// One parsed editor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Empty,
    Show,
    Set { field: CardField, value: String },
    /// A file path or a `data:` URL.
    Upload(String),
    Prompt(String),
    Ai(Option<String>),
    Undo,
    Qr(bool),
    Direction(Direction),
    Export(FormatSelection),
    Vcard,
    Help,
    Quit,
}

/// Parse one input line.
///
/// # Errors
/// Returns error for unknown commands or missing/invalid arguments.
pub fn parse_command(line: &str) -> Result<ReplCommand> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb.to_lowercase().as_str() {
        "" => ReplCommand::Empty,
        "show" => ReplCommand::Show,
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(field, value)| (field, value.trim_start()));
            if field.is_empty() {
                return Err(AppError::invalid_input("Usage: set <field> <value...>"));
            }
            ReplCommand::Set {
                field: field.parse()?,
                value: unescape_newlines(value),
            }
        }
        "upload" => {
            if rest.is_empty() {
                return Err(AppError::invalid_input("Usage: upload <path>"));
            }
            ReplCommand::Upload(rest.to_string())
        }
        "prompt" => ReplCommand::Prompt(rest.to_string()),
        "ai" => ReplCommand::Ai((!rest.is_empty()).then(|| rest.to_string())),
        "undo" => ReplCommand::Undo,
        "qr" => match rest.to_lowercase().as_str() {
            "on" => ReplCommand::Qr(true),
            "off" => ReplCommand::Qr(false),
            _ => return Err(AppError::invalid_input("Usage: qr on|off")),
        },
        "direction" => ReplCommand::Direction(rest.parse()?),
        "export" => ReplCommand::Export(if rest.is_empty() {
            FormatSelection::All
        } else {
            rest.parse()?
        }),
        "vcard" => ReplCommand::Vcard,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => {
            return Err(AppError::invalid_input(format!(
                "Unknown command: {other}. Type 'help' for a list"
            )))
        }
    };
    Ok(command)
}

/// Run the editor until `quit` or end of input.
///
/// # Errors
/// Returns error only if stdin cannot be read.
pub async fn run_editor(
    session: &mut EditorSession,
    editor: Option<&GeminiClient>,
    output_dir: &Path,
    max_logo_bytes: u64,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", format_card_table(session.card()));
    println!("Type 'help' for commands.");

    loop {
        print!("{} ", "card>".bold());
        let _ = std::io::stdout().flush();

        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| AppError::io("Failed to read from stdin", e))?
        else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.to_string().red());
                continue;
            }
        };

        if command == ReplCommand::Quit {
            break;
        }
        if let Err(e) = execute(session, editor, output_dir, max_logo_bytes, command).await {
            println!("{}", e.to_string().red());
        }
    }

    Ok(())
}

async fn execute(
    session: &mut EditorSession,
    editor: Option<&GeminiClient>,
    output_dir: &Path,
    max_logo_bytes: u64,
    command: ReplCommand,
) -> Result<()> {
    match command {
        ReplCommand::Empty | ReplCommand::Quit => {}
        ReplCommand::Show => {
            println!("{}", format_card_table(session.card()));
            println!("{}", format_session_status(session));
        }
        ReplCommand::Set { field, value } => {
            session.update_field(field.key(), &value)?;
            println!("{} {} updated", "✓".green(), field.label());
        }
        ReplCommand::Upload(source) => {
            let bytes = match Logo::parse(&source) {
                inline @ Logo::Inline { .. } => inline.decode_bytes()?,
                Logo::Url(_) => read_logo_file(Path::new(&source), max_logo_bytes)?,
            };
            let logo = session.upload_logo(&bytes)?;
            println!(
                "{} Logo uploaded ({})",
                "✓".green(),
                logo.mime().unwrap_or("image")
            );
        }
        ReplCommand::Prompt(text) => {
            session.set_prompt(text);
        }
        ReplCommand::Ai(text) => {
            if let Some(text) = text {
                session.set_prompt(text);
            }
            let editor = editor.ok_or_else(|| AppError::Config {
                message: "Image editing is unavailable: no API key configured".into(),
            })?;
            println!("{}", "Generating...".dimmed());
            match session.request_ai_edit(editor).await {
                Ok(_) => println!("{} Logo updated", "✓".green()),
                Err(AppError::EmptyPrompt) => println!("{}", "Enter an edit instruction first.".yellow()),
                Err(e) => {
                    // The session already holds the message meant for the user.
                    let message = session.error().map_or_else(|| e.to_string(), str::to_string);
                    println!("{}", message.red());
                }
            }
        }
        ReplCommand::Undo => match session.undo() {
            Some(_) => println!("{} Reverted to the previous logo", "✓".green()),
            None => println!("{}", "Nothing to undo.".yellow()),
        },
        ReplCommand::Qr(show) => session.set_show_qr_code(show),
        ReplCommand::Direction(direction) => session.set_direction(direction),
        ReplCommand::Export(selection) => {
            for format in selection.formats() {
                match session.export(format) {
                    Ok(artifact) => {
                        let path = save_artifact(output_dir, &artifact)?;
                        println!("{}", format_saved(&artifact, &path));
                    }
                    Err(_) => {
                        let message = session.error().unwrap_or_default().to_string();
                        println!("{}", message.red());
                    }
                }
            }
        }
        ReplCommand::Vcard => print!("{}", encode_vcard(session.card())),
        ReplCommand::Help => println!("{HELP}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExportFormat;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("").unwrap(), ReplCommand::Empty);
        assert_eq!(parse_command("  SHOW ").unwrap(), ReplCommand::Show);
        assert_eq!(parse_command("undo").unwrap(), ReplCommand::Undo);
        assert_eq!(parse_command("exit").unwrap(), ReplCommand::Quit);
        assert_eq!(parse_command("qr off").unwrap(), ReplCommand::Qr(false));
        assert_eq!(
            parse_command("direction column").unwrap(),
            ReplCommand::Direction(Direction::Column)
        );
    }

    #[test]
    fn test_parse_set_keeps_value_spacing() {
        assert_eq!(
            parse_command("set name  Jane  Doe").unwrap(),
            ReplCommand::Set {
                field: CardField::Name,
                value: "Jane  Doe".into(),
            }
        );
        assert_eq!(
            parse_command("set address Line1\\nLine2").unwrap(),
            ReplCommand::Set {
                field: CardField::Address,
                value: "Line1\nLine2".into(),
            }
        );
        assert_eq!(
            parse_command("set description").unwrap(),
            ReplCommand::Set {
                field: CardField::Description,
                value: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_ai_and_export() {
        assert_eq!(parse_command("ai").unwrap(), ReplCommand::Ai(None));
        assert_eq!(
            parse_command("ai make it round").unwrap(),
            ReplCommand::Ai(Some("make it round".into()))
        );
        assert_eq!(
            parse_command("export").unwrap(),
            ReplCommand::Export(FormatSelection::All)
        );
        assert_eq!(
            parse_command("export pdf").unwrap(),
            ReplCommand::Export(FormatSelection::One(ExportFormat::Pdf))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("fly").is_err());
        assert!(parse_command("set").is_err());
        assert!(parse_command("set fax 123").is_err());
        assert!(parse_command("upload").is_err());
        assert_eq!(
            parse_command("upload ./my logo.png").unwrap(),
            ReplCommand::Upload("./my logo.png".into())
        );
        assert!(parse_command("qr maybe").is_err());
        assert!(parse_command("export gif").is_err());
    }
}
