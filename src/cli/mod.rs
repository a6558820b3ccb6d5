//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

pub mod repl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{AppError, CardField, Direction, ExportFormat, Result};

/// Josera Card - edit a digital business card and export it as JPEG, PDF or
/// interactive HTML.
///
/// Quick start: josera-card edit | export --format all --set name="Jane Doe"
#[derive(Parser, Debug)]
#[command(name = "josera-card")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (defaults to the user config directory).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit the card interactively.
    Edit,

    /// Export the card in one step.
    Export {
        /// What to export: jpg, pdf, html or all.
        #[arg(short, long, default_value = "all")]
        format: FormatSelection,

        /// Output directory (defaults to export.output_dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Logo image to upload before exporting.
        #[arg(short, long)]
        logo: Option<PathBuf>,

        /// Override a card field, e.g. --set name="Jane Doe" (repeatable).
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(CardField, String)>,

        /// Leave the contact QR code off the card.
        #[arg(long)]
        no_qr: bool,

        /// Face layout for JPEG/PDF: row or column.
        #[arg(short, long)]
        direction: Option<Direction>,

        /// Edit the uploaded logo with this instruction before exporting.
        #[arg(short, long, requires = "logo")]
        prompt: Option<String>,
    },

    /// Print the contact record encoded in the QR code.
    Vcard {
        /// Override a card field, e.g. --set phone="+62 800" (repeatable).
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(CardField, String)>,
    },

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write the default configuration file if it doesn't exist.
    Init {
        /// Overwrite an existing file with the effective configuration.
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path.
    Path,

    /// Print the effective configuration.
    Show,
}

/// One export format or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelection {
    One(ExportFormat),
    All,
}

impl FormatSelection {
    /// The formats to produce, in export order.
    #[must_use]
    pub fn formats(self) -> Vec<ExportFormat> {
        match self {
            Self::One(format) => vec![format],
            Self::All => ExportFormat::ALL.to_vec(),
        }
    }
}

impl std::str::FromStr for FormatSelection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::One)
        }
    }
}

/// Parse `field=value`; a literal `\n` in the value becomes a line break.
///
/// # Errors
/// Returns error if there is no `=` or the field is unknown.
pub fn parse_assignment(s: &str) -> Result<(CardField, String)> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| AppError::invalid_input(format!("Expected field=value, got: {s}")))?;
    Ok((field.parse()?, unescape_newlines(value)))
}

/// Turn the two-character sequence `\n` into a newline.
#[must_use]
pub fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("name=Jane Doe").unwrap(),
            (CardField::Name, "Jane Doe".to_string())
        );
        assert_eq!(
            parse_assignment("address=Line1\\nLine2").unwrap(),
            (CardField::Address, "Line1\nLine2".to_string())
        );
        assert_eq!(
            parse_assignment("tagline=a=b").unwrap(),
            (CardField::Tagline, "a=b".to_string())
        );
        assert!(parse_assignment("name").is_err());
        assert!(parse_assignment("fax=1").is_err());
    }

    #[test]
    fn test_format_selection() {
        assert_eq!("all".parse::<FormatSelection>().unwrap().formats().len(), 3);
        assert_eq!(
            "JPG".parse::<FormatSelection>().unwrap(),
            FormatSelection::One(ExportFormat::Jpeg)
        );
        assert!("gif".parse::<FormatSelection>().is_err());
    }

    #[test]
    fn test_cli_parses_export() {
        let cli = Cli::try_parse_from([
            "josera-card",
            "-vv",
            "export",
            "--format",
            "pdf",
            "--set",
            "name=Jane",
            "--set",
            "title=CTO",
            "--no-qr",
            "--direction",
            "column",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Export {
                format,
                set,
                no_qr,
                direction,
                prompt,
                ..
            } => {
                assert_eq!(format, FormatSelection::One(ExportFormat::Pdf));
                assert_eq!(set.len(), 2);
                assert!(no_qr);
                assert_eq!(direction, Some(Direction::Column));
                assert!(prompt.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_prompt_requires_logo() {
        let result = Cli::try_parse_from(["josera-card", "export", "--prompt", "blue"]);
        assert!(result.is_err());
    }
}
